use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// 原子写入文件
///
/// 先写入同目录下的 `.<文件名>.tmp` 并落盘，再重命名为目标文件，
/// 进程中途退出时目标文件要么是旧内容，要么是完整的新内容。
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let tmp_path = tmp_path_for(path);

    let mut file = File::create(&tmp_path)?;
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp_path, path)
}

/// 目标文件对应的临时文件路径
pub fn tmp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    parent.join(format!(".{}.tmp", file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");

        write_atomic(&path, b"old").unwrap();
        write_atomic(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!tmp_path_for(&path).exists());
    }

    #[test]
    fn test_tmp_path_is_hidden_sibling() {
        let path = Path::new("out/batch_summary.json");
        assert_eq!(tmp_path_for(path), Path::new("out/.batch_summary.json.tmp"));
    }
}
