//! I/O entry points

pub mod dxf;

use std::path::Path;

use rayon::prelude::*;

use crate::document::CadDocument;
use crate::error::Result;

pub use dxf::{DxfReader, DxfReaderConfiguration, DxfWriter};

/// Load independent files on the rayon pool. Results keep the order of
/// `paths`.
pub fn read_files<P: AsRef<Path> + Sync>(paths: &[P]) -> Vec<Result<CadDocument>> {
    paths.par_iter().map(CadDocument::load_file).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Circle;
    use crate::types::DxfVersion;

    #[test]
    fn test_read_files_keeps_order() {
        let dir = std::env::temp_dir().join(format!("dxf-codec-read-files-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut paths = Vec::new();
        for count in 0..3 {
            let mut doc = CadDocument::new();
            for _ in 0..count {
                doc.add_entity(Circle::new()).unwrap();
            }
            let path = dir.join(format!("drawing{}.dxf", count));
            doc.save_file(&path, DxfVersion::AC1015, true).unwrap();
            paths.push(path);
        }
        paths.push(dir.join("missing.dxf"));

        let results = read_files(&paths);
        assert_eq!(results.len(), 4);
        for (count, result) in results.iter().take(3).enumerate() {
            assert_eq!(result.as_ref().unwrap().entities().count(), count);
        }
        assert!(results[3].is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
