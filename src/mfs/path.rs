//! Slash-separated MFS paths.

use crate::error::MfsError;
use std::fmt;

/// Parsed absolute path; no segments means the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MfsPath {
    segments: Vec<String>,
}

impl MfsPath {
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Parse an absolute path, collapsing empty segments
    pub fn parse(path: &str) -> Result<Self, MfsError> {
        if !path.starts_with('/') {
            return Err(MfsError::InvalidArgument(format!(
                "paths must start with a leading slash: {:?}",
                path
            )));
        }

        let mut segments = Vec::new();
        for segment in path.split('/') {
            match segment {
                "" => continue,
                "." | ".." => {
                    return Err(MfsError::InvalidArgument(format!(
                        "relative segment {:?} in path {:?}",
                        segment, path
                    )))
                }
                name => segments.push(name.to_string()),
            }
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, `None` for the root
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Parent path and final segment, `None` for the root
    pub fn split_last(&self) -> Option<(MfsPath, &str)> {
        let (name, parent) = self.segments.split_last()?;
        Some((
            MfsPath {
                segments: parent.to_vec(),
            },
            name.as_str(),
        ))
    }

    /// Path made of the first `len` segments, rendered as text
    pub fn prefix(&self, len: usize) -> String {
        render(&self.segments[..len.min(self.segments.len())])
    }
}

fn render(segments: &[String]) -> String {
    if segments.is_empty() {
        "/".to_string()
    } else {
        segments.iter().map(|s| format!("/{}", s)).collect()
    }
}

impl fmt::Display for MfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(&self.segments))
    }
}
