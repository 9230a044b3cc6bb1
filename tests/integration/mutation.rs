use futures::TryStreamExt;
use mfs::config::ChunkerConfig;
use mfs::tree::NodeKind;
use mfs::{Entry, ListOptions, MfsError, MkdirOptions, RmOptions, WriteOptions};

use crate::integration::support::{open_counting, open_memory, test_dir};

fn create() -> WriteOptions {
    WriteOptions {
        create: true,
        parents: true,
    }
}

async fn names(mfs: &mfs::Mfs, path: &str) -> Vec<String> {
    mfs.ls(path, ListOptions::default())
        .map_ok(|entry: Entry| entry.name)
        .try_collect()
        .await
        .unwrap()
}

async fn content(mfs: &mfs::Mfs, path: &str) -> Vec<u8> {
    let chunks: Vec<Vec<u8>> = mfs.read(path).try_collect().await.unwrap();
    chunks.concat()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_disjoint_writes_are_all_visible() {
    let mfs = open_memory().await;
    let dir = test_dir();
    mfs.mkdir(&dir, MkdirOptions::default()).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..16 {
        let mfs = mfs.clone();
        let path = format!("{}/file-{:02}", dir, i);
        handles.push(tokio::spawn(async move {
            mfs.write(&path, format!("payload {}", i).as_bytes(), create())
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let listed = names(&mfs, &dir).await;
    let expected: Vec<String> = (0..16).map(|i| format!("file-{:02}", i)).collect();
    assert_eq!(listed, expected);
    for i in 0..16 {
        assert_eq!(
            content(&mfs, &format!("{}/file-{:02}", dir, i)).await,
            format!("payload {}", i).into_bytes()
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_mkdir_in_separate_subtrees() {
    let mfs = open_memory().await;
    let dir = test_dir();

    let mut handles = Vec::new();
    for branch in ["left", "right", "middle"] {
        let mfs = mfs.clone();
        let path = format!("{}/{}/deep/leaf", dir, branch);
        handles.push(tokio::spawn(async move {
            mfs.mkdir(&path, MkdirOptions { parents: true }).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(names(&mfs, &dir).await, vec!["left", "middle", "right"]);
    for branch in ["left", "right", "middle"] {
        assert_eq!(
            mfs.kind(&format!("{}/{}/deep/leaf", dir, branch))
                .await
                .unwrap(),
            NodeKind::Directory
        );
    }
}

#[tokio::test]
async fn same_operations_produce_same_root() {
    let first = open_memory().await;
    let second = open_memory().await;

    for mfs in [&first, &second] {
        mfs.mkdir("/docs/drafts", MkdirOptions { parents: true })
            .await
            .unwrap();
        mfs.write("/docs/readme", b"read me", create()).await.unwrap();
        mfs.write("/docs/drafts/one", b"1", create()).await.unwrap();
    }
    assert_eq!(first.root_hash(), second.root_hash());

    // Insertion order does not matter
    let third = open_memory().await;
    third.write("/docs/drafts/one", b"1", create()).await.unwrap();
    third.write("/docs/readme", b"read me", create()).await.unwrap();
    assert_eq!(first.root_hash(), third.root_hash());
}

#[tokio::test]
async fn resolving_twice_gives_same_hash() {
    let mfs = open_memory().await;
    let path = format!("{}/x/y", test_dir());
    mfs.write(&path, b"stable", create()).await.unwrap();

    let a = mfs.stat(&path).await.unwrap();
    let b = mfs.stat(&path).await.unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn mkdir_existing_without_parents_fails() {
    let mfs = open_memory().await;
    let dir = test_dir();
    mfs.mkdir(&dir, MkdirOptions::default()).await.unwrap();

    let err = mfs.mkdir(&dir, MkdirOptions::default()).await.unwrap_err();
    assert!(matches!(err, MfsError::AlreadyExists(_)));

    let before = mfs.root();
    mfs.mkdir(&dir, MkdirOptions { parents: true }).await.unwrap();
    assert_eq!(mfs.root(), before);
}

#[tokio::test]
async fn mkdir_missing_parent_without_parents_fails() {
    let mfs = open_memory().await;
    let dir = test_dir();

    let err = mfs
        .mkdir(&format!("{}/a/b", dir), MkdirOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains(&dir));
}

#[tokio::test]
async fn mkdir_over_file_fails() {
    let mfs = open_memory().await;
    let path = format!("{}/f", test_dir());
    mfs.write(&path, b"x", create()).await.unwrap();

    let err = mfs
        .mkdir(&path, MkdirOptions { parents: true })
        .await
        .unwrap_err();
    assert!(matches!(err, MfsError::AlreadyExists(_)));
}

#[tokio::test]
async fn write_without_create_requires_existing_file() {
    let mfs = open_memory().await;
    let dir = test_dir();
    mfs.mkdir(&dir, MkdirOptions::default()).await.unwrap();

    let err = mfs
        .write(&format!("{}/new", dir), b"x", WriteOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn write_onto_directory_fails() {
    let mfs = open_memory().await;
    let dir = test_dir();
    mfs.mkdir(&dir, MkdirOptions::default()).await.unwrap();

    let err = mfs.write(&dir, b"x", create()).await.unwrap_err();
    assert!(matches!(err, MfsError::InvalidArgument(_)));
}

#[tokio::test]
async fn write_through_file_fails() {
    let mfs = open_memory().await;
    let file = format!("{}/f", test_dir());
    mfs.write(&file, b"x", create()).await.unwrap();

    let err = mfs
        .write(&format!("{}/g", file), b"y", create())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn write_root_is_invalid() {
    let mfs = open_memory().await;
    let err = mfs.write("/", b"x", create()).await.unwrap_err();
    assert!(matches!(err, MfsError::InvalidArgument(_)));
}

#[tokio::test]
async fn rm_file_and_directory() {
    let mfs = open_memory().await;
    let dir = test_dir();
    mfs.write(&format!("{}/sub/f", dir), b"x", create())
        .await
        .unwrap();
    mfs.write(&format!("{}/g", dir), b"y", create()).await.unwrap();

    mfs.rm(&format!("{}/g", dir), RmOptions::default())
        .await
        .unwrap();
    assert_eq!(names(&mfs, &dir).await, vec!["sub"]);

    let err = mfs
        .rm(&format!("{}/sub", dir), RmOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, MfsError::InvalidArgument(_)));

    mfs.rm(&format!("{}/sub", dir), RmOptions { recursive: true })
        .await
        .unwrap();
    assert!(names(&mfs, &dir).await.is_empty());
}

#[tokio::test]
async fn rm_missing_and_root_fail() {
    let mfs = open_memory().await;
    let dir = test_dir();
    mfs.mkdir(&dir, MkdirOptions::default()).await.unwrap();

    let err = mfs
        .rm(&format!("{}/ghost", dir), RmOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = mfs.rm("/", RmOptions { recursive: true }).await.unwrap_err();
    assert!(matches!(err, MfsError::InvalidArgument(_)));
}

#[tokio::test]
async fn rm_then_recreate_restores_root() {
    let mfs = open_memory().await;
    mfs.mkdir("/keep", MkdirOptions::default()).await.unwrap();
    let before = mfs.root();

    mfs.write("/keep/tmp", b"temp", create()).await.unwrap();
    assert_ne!(mfs.root(), before);
    mfs.rm("/keep/tmp", RmOptions::default()).await.unwrap();
    assert_eq!(mfs.root(), before);
}

#[tokio::test]
async fn readers_keep_their_snapshot_across_rm() {
    let (mfs, _store) = open_counting(ChunkerConfig {
        chunk_size: 2,
        max_links: 2,
    })
    .await;
    let path = format!("{}/f", test_dir());
    mfs.write(&path, b"abcdefgh", create()).await.unwrap();

    let stream = mfs.read(&path);
    mfs.rm(&path, RmOptions::default()).await.unwrap();

    let chunks: Vec<Vec<u8>> = stream.try_collect().await.unwrap();
    assert_eq!(chunks.concat(), b"abcdefgh".to_vec());

    let err = mfs.stat(&path).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn directory_sizes_follow_content() {
    let mfs = open_memory().await;
    let dir = test_dir();
    mfs.write(&format!("{}/a/one", dir), b"12345", create())
        .await
        .unwrap();
    mfs.write(&format!("{}/a/two", dir), b"123", create())
        .await
        .unwrap();
    mfs.write(&format!("{}/three", dir), b"1", create())
        .await
        .unwrap();

    let stat = mfs.stat(&dir).await.unwrap();
    assert_eq!(stat.cumulative_size, 9);
    assert_eq!(stat.blocks, 2);

    mfs.rm(&format!("{}/a/one", dir), RmOptions::default())
        .await
        .unwrap();
    assert_eq!(mfs.stat(&dir).await.unwrap().cumulative_size, 4);
}
