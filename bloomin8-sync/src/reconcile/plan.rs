//! Filename-keyed diff between a local folder and a remote gallery.
//!
//! Identity is the bare file name only. A local file whose name already
//! exists in the gallery is unchanged even if its content differs.

use bloomin8_client::fs::LocalImage;
use bloomin8_client::models::GalleryImage;
use std::collections::BTreeSet;

/// One image in the target gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteImage {
    pub name: String,
    pub size: Option<u64>,
}

impl RemoteImage {
    /// Entries the device lists without a name are dropped.
    pub fn from_gallery(images: Vec<GalleryImage>) -> Vec<RemoteImage> {
        images
            .into_iter()
            .filter_map(|image| {
                image.name.map(|name| RemoteImage {
                    name,
                    size: image.size,
                })
            })
            .collect()
    }
}

/// What a sync run will do.
///
/// `to_upload` and `unchanged` keep the order of the local listing;
/// `to_delete` is sorted by name. The three sets are pairwise disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub to_upload: Vec<LocalImage>,
    pub to_delete: Vec<String>,
    pub unchanged: Vec<LocalImage>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.to_upload.is_empty() && self.to_delete.is_empty()
    }
}

fn remote_names(remote: &[RemoteImage]) -> BTreeSet<&str> {
    remote.iter().map(|image| image.name.as_str()).collect()
}

/// Build the plan. Deletions are only planned when `mirror` is set.
pub fn plan(local: &[LocalImage], remote: &[RemoteImage], mirror: bool) -> SyncPlan {
    let remote_names = remote_names(remote);

    let (unchanged, to_upload): (Vec<_>, Vec<_>) = local
        .iter()
        .cloned()
        .partition(|image| remote_names.contains(image.filename.as_str()));

    let to_delete = if mirror { orphans(local, remote) } else { Vec::new() };

    SyncPlan {
        to_upload,
        to_delete,
        unchanged,
    }
}

/// Remote names with no local counterpart, sorted.
pub fn orphans(local: &[LocalImage], remote: &[RemoteImage]) -> Vec<String> {
    let local_names: BTreeSet<&str> = local.iter().map(|image| image.filename.as_str()).collect();
    remote_names(remote)
        .into_iter()
        .filter(|name| !local_names.contains(name))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use std::path::PathBuf;

    pub fn local(names: &[&str]) -> Vec<LocalImage> {
        names
            .iter()
            .map(|name| LocalImage {
                filename: name.to_string(),
                size_bytes: 1024,
                path: PathBuf::from("/photos").join(name),
            })
            .collect()
    }

    pub fn remote(names: &[&str]) -> Vec<RemoteImage> {
        names
            .iter()
            .map(|name| RemoteImage {
                name: name.to_string(),
                size: Some(1024),
            })
            .collect()
    }
}
