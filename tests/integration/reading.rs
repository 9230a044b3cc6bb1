use futures::{StreamExt, TryStreamExt};
use mfs::config::ChunkerConfig;
use mfs::store::load_node;
use mfs::tree::hasher::compute_block_hash;
use mfs::tree::DagNode;
use mfs::types::parse_hash;
use mfs::{MfsError, MkdirOptions, WriteOptions};

use crate::integration::support::{open_counting, open_memory, test_dir};

fn small_chunks() -> ChunkerConfig {
    ChunkerConfig {
        chunk_size: 4,
        max_links: 2,
    }
}

fn create() -> WriteOptions {
    WriteOptions {
        create: true,
        parents: true,
    }
}

#[tokio::test]
async fn read_not_found_yields_single_error() {
    let mfs = open_memory().await;
    let dir = test_dir();

    let items: Vec<_> = mfs.read(&format!("{}/404", dir)).collect().await;

    assert_eq!(items.len(), 1);
    let err = items.into_iter().next().unwrap().unwrap_err();
    assert!(
        err.to_string().contains("does not exist"),
        "unexpected message: {}",
        err
    );
}

#[tokio::test]
async fn read_file_as_single_chunk() {
    let mfs = open_memory().await;
    let dir = test_dir();
    mfs.mkdir(&dir, MkdirOptions::default()).await.unwrap();
    mfs.write(
        &format!("{}/a", dir),
        b"Hello, world!",
        WriteOptions {
            create: true,
            parents: false,
        },
    )
    .await
    .unwrap();

    let chunks: Vec<Vec<u8>> = mfs
        .read(&format!("{}/a", dir))
        .try_collect()
        .await
        .unwrap();
    assert_eq!(chunks, vec![b"Hello, world!".to_vec()]);
}

#[tokio::test]
async fn read_chunks_follow_leaf_boundaries() {
    let (mfs, _store) = open_counting(small_chunks()).await;
    let path = format!("{}/a", test_dir());
    mfs.write(&path, b"Hello, world!", create()).await.unwrap();

    let chunks: Vec<Vec<u8>> = mfs.read(&path).try_collect().await.unwrap();
    assert_eq!(
        chunks,
        vec![
            b"Hell".to_vec(),
            b"o, w".to_vec(),
            b"orld".to_vec(),
            b"!".to_vec()
        ]
    );
}

#[tokio::test]
async fn read_round_trips_large_content() {
    let (mfs, _store) = open_counting(ChunkerConfig {
        chunk_size: 7,
        max_links: 3,
    })
    .await;
    let path = format!("{}/big", test_dir());
    let data: Vec<u8> = (0..1000u32).map(|i| (i * 31 % 251) as u8).collect();
    mfs.write(&path, &data, create()).await.unwrap();

    let chunks: Vec<Vec<u8>> = mfs.read(&path).try_collect().await.unwrap();
    assert_eq!(chunks.concat(), data);
    assert!(chunks.iter().all(|chunk| chunk.len() <= 7));

    let stat = mfs.stat(&path).await.unwrap();
    assert_eq!(stat.size, 1000);
    assert!(stat.blocks <= 3);
}

#[tokio::test]
async fn read_empty_file() {
    let mfs = open_memory().await;
    let path = format!("{}/empty", test_dir());
    mfs.write(&path, b"", create()).await.unwrap();

    let chunks: Vec<Vec<u8>> = mfs.read(&path).try_collect().await.unwrap();
    assert_eq!(chunks.concat(), Vec::<u8>::new());
}

#[tokio::test]
async fn overwrite_replaces_content() {
    let mfs = open_memory().await;
    let path = format!("{}/f", test_dir());
    mfs.write(&path, b"a much longer first version", create())
        .await
        .unwrap();
    mfs.write(&path, b"short", WriteOptions::default())
        .await
        .unwrap();

    let chunks: Vec<Vec<u8>> = mfs.read(&path).try_collect().await.unwrap();
    assert_eq!(chunks.concat(), b"short".to_vec());
}

#[tokio::test]
async fn read_abandoned_after_first_chunk_fetches_no_further_leaves() {
    let (mfs, store) = open_counting(small_chunks()).await;
    let path = format!("{}/a", test_dir());
    mfs.write(&path, b"0123456789abcdef", create()).await.unwrap();

    let before = store.gets();
    let mut stream = mfs.read(&path);
    assert_eq!(store.gets(), before);
    let first = stream.next().await.unwrap().unwrap();
    let after_first = store.gets();
    drop(stream);

    assert_eq!(first, b"0123".to_vec());
    // 4 leaves under a 2-wide layout: root, test dir, file root, one inner node, first leaf
    assert_eq!(after_first - before, 5);
    assert_eq!(store.gets(), after_first);

    let before = store.gets();
    let chunks: Vec<Vec<u8>> = mfs.read(&path).try_collect().await.unwrap();
    assert_eq!(chunks.len(), 4);
    assert_eq!(store.gets() - before, 9);
}

#[tokio::test]
async fn read_missing_leaf_ends_stream_after_partial_output() {
    let (mfs, store) = open_counting(small_chunks()).await;
    let path = format!("{}/a", test_dir());
    mfs.write(&path, b"aaaabbbbcccc", create()).await.unwrap();

    // Forget the leaf holding "bbbb"
    let leaf = DagNode::Leaf(b"bbbb".to_vec()).encode().unwrap();
    store.forget(compute_block_hash(&leaf));

    let items: Vec<_> = mfs.read(&path).collect().await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().unwrap(), &b"aaaa".to_vec());
    assert!(matches!(items[1], Err(MfsError::StorageError(_))));
}

#[tokio::test]
async fn read_directory_is_invalid() {
    let mfs = open_memory().await;
    let dir = test_dir();
    mfs.mkdir(&dir, MkdirOptions::default()).await.unwrap();

    let items: Vec<_> = mfs.read(&dir).collect().await;
    assert_eq!(items.len(), 1);
    assert!(matches!(items[0], Err(MfsError::InvalidArgument(_))));
}

#[tokio::test]
async fn read_through_file_is_not_found() {
    let mfs = open_memory().await;
    let path = format!("{}/f", test_dir());
    mfs.write(&path, b"x", create()).await.unwrap();

    let items: Vec<_> = mfs.read(&format!("{}/inner", path)).collect().await;
    assert_eq!(items.len(), 1);
    let err = items.into_iter().next().unwrap().unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[tokio::test]
async fn file_root_layout_matches_stat() {
    let (mfs, store) = open_counting(small_chunks()).await;
    let path = format!("{}/a", test_dir());
    mfs.write(&path, b"0123456789", create()).await.unwrap();

    let stat = mfs.stat(&path).await.unwrap();
    let root = load_node(store.as_ref(), &parse_hash(&stat.hash).unwrap())
        .await
        .unwrap();
    match root {
        DagNode::File(file) => {
            assert_eq!(file.size(), 10);
            assert_eq!(file.links.len(), 2);
        }
        other => panic!("expected a file node, got {:?}", other),
    }
}
