use crate::error::{AppResult, InputError, ReviewError};
use crate::models::job::{file_stem, JobDescriptor};
use crate::models::paper::PaperData;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 JSON 文件加载论文描述文档
pub async fn load_paper(json_file_path: &Path) -> Result<PaperData, ReviewError> {
    let content = fs::read_to_string(json_file_path)
        .await
        .map_err(|e| ReviewError::io(json_file_path.display().to_string(), e))?;

    serde_json::from_str(&content).map_err(|e| ReviewError::MalformedDocument {
        path: json_file_path.display().to_string(),
        reason: e.to_string(),
    })
}

/// 扫描论文目录，为每个匹配的文件生成任务描述符
///
/// # 参数
/// - `papers_dir`: 论文目录
/// - `pattern`: glob 模式（相对于论文目录，如 `*.json`）
/// - `output_dir`: 批次输出目录
///
/// # 返回
/// 按路径排序的任务描述符列表；目录不存在或没有匹配文件时返回输入错误
pub fn discover_jobs(
    papers_dir: &Path,
    pattern: &str,
    output_dir: &Path,
) -> AppResult<Vec<JobDescriptor>> {
    if !papers_dir.is_dir() {
        return Err(InputError::DirectoryNotFound {
            path: papers_dir.display().to_string(),
        }
        .into());
    }

    let full_pattern = papers_dir.join(pattern).to_string_lossy().into_owned();
    let entries = glob::glob(&full_pattern).map_err(|source| InputError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut paper_files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => paper_files.push(path),
            Ok(_) => {}
            Err(e) => tracing::warn!("无法读取匹配项 {}: {}", e.path().display(), e),
        }
    }

    if paper_files.is_empty() {
        return Err(InputError::NoMatchingFiles {
            dir: papers_dir.display().to_string(),
            pattern: pattern.to_string(),
        }
        .into());
    }

    paper_files.sort();
    tracing::info!("✓ 找到 {} 个论文文件", paper_files.len());

    let names = assign_job_names(papers_dir, &paper_files);
    Ok(paper_files
        .into_iter()
        .zip(names)
        .map(|(path, name)| JobDescriptor::with_name(path, name, output_dir))
        .collect())
}

/// 为每个文件分配唯一的任务名称（同时也是输出目录名）
///
/// 文件名不重复时使用文件名；不同子目录下的同名文件使用相对路径，
/// 如 `nature/paper.json` → `nature_paper`；仍冲突时追加序号
fn assign_job_names(papers_dir: &Path, files: &[PathBuf]) -> Vec<String> {
    let mut stem_counts: HashMap<String, usize> = HashMap::new();
    for file in files {
        *stem_counts.entry(file_stem(file)).or_default() += 1;
    }

    let mut used = HashSet::new();
    files
        .iter()
        .map(|file| {
            let stem = file_stem(file);
            let base = if stem_counts.get(&stem).copied().unwrap_or(0) > 1 {
                relative_name(papers_dir, file)
            } else {
                stem
            };

            let mut name = base.clone();
            let mut suffix = 2;
            while !used.insert(name.clone()) {
                name = format!("{}_{}", base, suffix);
                suffix += 1;
            }
            if name != file_stem(file) {
                tracing::warn!("⚠️ 文件名重复，{} 的任务名称改为 {}", file.display(), name);
            }
            name
        })
        .collect()
}

fn relative_name(papers_dir: &Path, file: &Path) -> String {
    file.strip_prefix(papers_dir)
        .unwrap_or(file)
        .with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("_")
}
