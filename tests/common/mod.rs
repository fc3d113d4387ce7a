use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const ORDERS_CSV: &str = "\
zone,client_name,Status,state,Tier,Amount
North,Acme,Completed ,CA,Gold,10
North,Acme,completed,,,12
North,Acme,Pending,NV,,3
North,Beta,cancelled,OR,Silver,7
North,Beta,Returned,OR,Silver,7
South,Gamma,hold,TX,,1
South,Gamma,COMPLETE,TX,Bronze,4
South,Delta,canceled,,,2
East,Echo,completed,NY,Gold,9
";

/// Write `contents` into a fresh temp dir and return both.
pub fn write_fixture(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    (dir, path)
}
