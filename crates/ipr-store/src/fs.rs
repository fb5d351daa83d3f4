use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use ipr_crypto::{BlockHasher, HasherError};
use ipr_types::{Block, Cid};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::{StoreError, StoreResult};
use crate::traits::BlockStore;

/// Filesystem block store: one file per block.
///
/// Layout is `<root>/<shard>/<cid>`, where `<shard>` is the last two
/// characters of the CID's string form. Writes go through a temp file in the
/// shard directory and are renamed into place, so a crashed write never
/// leaves a truncated block under a valid name.
#[derive(Clone, Debug)]
pub struct FsBlockStore {
    root: PathBuf,
    verify_on_read: bool,
}

impl FsBlockStore {
    /// Open (creating if needed) a store rooted at `root`.
    ///
    /// Reads are verified against their CID by default.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            verify_on_read: true,
        })
    }

    /// Enable or disable hash verification on read.
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify_on_read = verify;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, cid: &Cid) -> PathBuf {
        let name = cid.to_string();
        let shard = &name[name.len().saturating_sub(2)..];
        self.root.join(shard).join(name)
    }

    /// All CIDs on disk, sorted. Temp files are skipped.
    pub fn all_cids(&self) -> StoreResult<Vec<Cid>> {
        let mut cids = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(2).max_depth(2) {
            let entry = entry.map_err(|e| StoreError::Io(io::Error::other(e.to_string())))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if name.starts_with('.') {
                continue;
            }
            let cid = name.parse::<Cid>().map_err(|e| StoreError::CorruptBlock {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
            cids.push(cid);
        }
        cids.sort();
        Ok(cids)
    }
}

fn not_found_or_io(err: io::Error, cid: &Cid) -> StoreError {
    if err.kind() == io::ErrorKind::NotFound {
        StoreError::NotFound(*cid)
    } else {
        StoreError::Io(err)
    }
}

impl BlockStore for FsBlockStore {
    fn get(&self, cid: &Cid) -> StoreResult<Block> {
        let data = fs::read(self.path_for(cid)).map_err(|e| not_found_or_io(e, cid))?;
        let block = Block::new(*cid, data);
        if self.verify_on_read {
            match BlockHasher::verify(&block) {
                Ok(true) => {}
                Ok(false) => return Err(StoreError::HashMismatch(*cid)),
                Err(HasherError::UnsupportedHash(code)) => {
                    debug!(%cid, code, "skipping verification for unsupported hash");
                }
                Err(e) => {
                    return Err(StoreError::CorruptBlock {
                        name: cid.to_string(),
                        reason: e.to_string(),
                    })
                }
            }
        }
        Ok(block)
    }

    fn put(&self, block: &Block) -> StoreResult<()> {
        let path = self.path_for(block.cid());
        if path.try_exists()? {
            return Ok(());
        }
        let shard_dir = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(shard_dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(shard_dir)?;
        tmp.write_all(block.data())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        trace!(cid = %block.cid(), path = %path.display(), "wrote block file");
        Ok(())
    }

    fn delete(&self, cid: &Cid) -> StoreResult<()> {
        fs::remove_file(self.path_for(cid)).map_err(|e| not_found_or_io(e, cid))
    }

    fn has(&self, cid: &Cid) -> StoreResult<bool> {
        Ok(self.path_for(cid).try_exists()?)
    }
}
