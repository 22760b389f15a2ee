use crate::error::{AppError, AppResult, FileError, LoadError};
use crate::models::catalog::{Catalog, CatalogItem, MetadataIndex};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// 题目表必需的列
pub const REQUIRED_COLUMNS: [&str; 6] = ["topic", "level", "file_path", "Q", "A", "C"];

/// 进程级缓存，第一次成功加载后不再重新读取
static CATALOG: OnceLock<Arc<Catalog>> = OnceLock::new();

/// 数据源路径
#[derive(Debug, Clone)]
pub struct CatalogPaths {
    pub catalog_csv: PathBuf,
    pub metadata_json: PathBuf,
}

impl CatalogPaths {
    pub fn new(catalog_csv: impl Into<PathBuf>, metadata_json: impl Into<PathBuf>) -> Self {
        Self {
            catalog_csv: catalog_csv.into(),
            metadata_json: metadata_json.into(),
        }
    }
}

/// 加载题库（带进程级缓存）
///
/// 缓存建立后参数不再生效，直到进程重启
pub fn load_cached(paths: &CatalogPaths) -> AppResult<Arc<Catalog>> {
    if let Some(catalog) = CATALOG.get() {
        debug!("使用已缓存的题库 ({} 条)", catalog.len());
        return Ok(Arc::clone(catalog));
    }

    let loaded = Arc::new(load_catalog(paths)?);
    Ok(Arc::clone(CATALOG.get_or_init(|| loaded)))
}

/// 读取题目表和法规元数据，并按 file_path 关联法规名称
pub fn load_catalog(paths: &CatalogPaths) -> AppResult<Catalog> {
    info!("📁 正在加载题目表: {}", paths.catalog_csv.display());
    let mut items = read_catalog_csv(&paths.catalog_csv)?;

    info!("📁 正在加载法规元数据: {}", paths.metadata_json.display());
    let metadata = read_metadata_json(&paths.metadata_json)?;

    let key_names = invert_metadata(&metadata);
    let mut unmatched = 0usize;
    for item in items.iter_mut() {
        item.key_name = key_names.get(item.file_path.as_str()).map(|k| k.to_string());
        if item.key_name.is_none() {
            unmatched += 1;
        }
    }

    if unmatched > 0 {
        warn!("⚠️ {} 条题目在元数据中找不到对应的法规名称", unmatched);
    }

    Ok(Catalog::new(items))
}

/// 构建 file_path -> key_name 的反向索引
///
/// 多个法规指向同一文件时，按 key_name 顺序排在后面的生效
pub fn invert_metadata(metadata: &MetadataIndex) -> HashMap<&str, &str> {
    metadata
        .iter()
        .map(|(key_name, entry)| (entry.file_path.as_str(), key_name.as_str()))
        .collect()
}

fn read_catalog_csv(path: &Path) -> AppResult<Vec<CatalogItem>> {
    let display = path.display().to_string();
    let content = fs::read(path).map_err(|e| AppError::file_read_failed(&display, e))?;

    let csv_error = |source| FileError::CsvParseFailed {
        path: display.clone(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(content.as_slice());

    let headers = reader.headers().map_err(csv_error)?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn {
                path: display.clone(),
                column: column.to_string(),
            }
            .into());
        }
    }

    let mut items = Vec::new();
    for record in reader.deserialize::<CatalogItem>() {
        items.push(record.map_err(csv_error)?);
    }

    debug!("题目表共 {} 行", items.len());
    Ok(items)
}

fn read_metadata_json(path: &Path) -> AppResult<MetadataIndex> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| AppError::file_read_failed(&display, e))?;

    let raw: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&content).map_err(|source| FileError::JsonParseFailed {
            path: display.clone(),
            source,
        })?;

    let mut metadata = MetadataIndex::new();
    for (key_name, value) in raw {
        if !value.get("file_path").map_or(false, |v| v.is_string()) {
            return Err(LoadError::MetadataWithoutFilePath {
                path: display,
                key_name,
            }
            .into());
        }
        let entry = serde_json::from_value(value).map_err(|source| FileError::JsonParseFailed {
            path: display.clone(),
            source,
        })?;
        metadata.insert(key_name, entry);
    }

    debug!("法规元数据共 {} 条", metadata.len());
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const METADATA: &str = r#"{
        "Luật Quản lý thuế 2019": {"file_path": "data/luat_thue.pdf", "year": 2019},
        "Bộ luật Lao động 2019": {"file_path": "data/bo_luat_lao_dong.pdf"}
    }"#;

    #[test]
    fn test_load_joins_key_names_by_file_path() {
        let csv = write_temp(
            ",topic,level,file_path,Q,A,C\n\
             0,tax,Remember,data/luat_thue.pdf,\"Thuế là gì, theo luật?\",Khoản thu,Điều 3\n\
             1,labor,Remember,data/bo_luat_lao_dong.pdf,Q2,A2,C2\n\
             2,tax,Remember,data/unknown.pdf,Q3,A3,C3\n",
        );
        let json = write_temp(METADATA);

        let catalog = load_catalog(&CatalogPaths::new(csv.path(), json.path())).unwrap();

        assert_eq!(catalog.len(), 3);
        let first = catalog.get(0).unwrap();
        assert_eq!(first.key_name.as_deref(), Some("Luật Quản lý thuế 2019"));
        assert_eq!(first.q, "Thuế là gì, theo luật?");
        assert_eq!(
            catalog.get(1).unwrap().key_name.as_deref(),
            Some("Bộ luật Lao động 2019")
        );
        let last = catalog.get(2).unwrap();
        assert_eq!(last.index, 2);
        assert!(last.key_name.is_none());
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let csv = write_temp("topic,level,file_path,Q,A\ntax,Remember,a.pdf,Q,A\n");
        let json = write_temp(METADATA);

        let err = load_catalog(&CatalogPaths::new(csv.path(), json.path())).unwrap_err();
        assert!(matches!(
            err,
            AppError::Load(LoadError::MissingColumn { ref column, .. }) if column == "C"
        ));
    }

    #[test]
    fn test_missing_metadata_file_is_fatal() {
        let csv = write_temp("topic,level,file_path,Q,A,C\ntax,Remember,a.pdf,Q,A,C\n");
        let err = load_catalog(&CatalogPaths::new(csv.path(), "/nonexistent/law_metadata.json"))
            .unwrap_err();
        assert!(matches!(err, AppError::File(FileError::NotFound { .. })));
    }

    #[test]
    fn test_malformed_metadata_is_fatal() {
        let csv = write_temp("topic,level,file_path,Q,A,C\ntax,Remember,a.pdf,Q,A,C\n");
        let json = write_temp(r#"{"Luật": {"year": 2019}}"#);
        let err = load_catalog(&CatalogPaths::new(csv.path(), json.path())).unwrap_err();
        assert!(matches!(
            err,
            AppError::Load(LoadError::MetadataWithoutFilePath { ref key_name, .. }) if key_name == "Luật"
        ));

        let broken = write_temp("{not json");
        let err = load_catalog(&CatalogPaths::new(csv.path(), broken.path())).unwrap_err();
        assert!(matches!(err, AppError::File(FileError::JsonParseFailed { .. })));
    }

    #[test]
    fn test_cached_load_returns_same_catalog() {
        let csv = write_temp("topic,level,file_path,Q,A,C\ntax,Remember,a.pdf,Q,A,C\n");
        let json = write_temp(r#"{"Luật": {"file_path": "a.pdf"}}"#);
        let paths = CatalogPaths::new(csv.path(), json.path());

        let first = load_cached(&paths).unwrap();
        let second = load_cached(&CatalogPaths::new("/nonexistent.csv", "/nonexistent.json")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
