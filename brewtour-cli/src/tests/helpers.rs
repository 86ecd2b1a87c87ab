//! Temporary workspaces and candidate fixtures shared by CLI tests.

use brewtour_core::Candidate;
use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use std::fs;
use tempfile::TempDir;

pub(super) struct Workspace {
    _tmp: TempDir,
    pub(super) root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self { _tmp: tmp, root }
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write file");
}

/// The CSV dataset shipped with the data crate's behaviour tests.
pub(super) fn baltic_dataset() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../brewtour-data/tests/fixtures/baltic")
}

pub(super) fn baltic_candidates() -> Vec<Candidate> {
    vec![
        Candidate::new(
            1,
            "Volfas Engelman",
            Coord {
                x: 23.930_2,
                y: 54.888_9,
            },
            vec!["Grünwald".into(), "Porter".into()],
        ),
        Candidate::new(
            2,
            "Švyturys",
            Coord {
                x: 21.128_9,
                y: 55.714_7,
            },
            vec!["Ekstra".into()],
        ),
    ]
}
