//! CSV/Excel 批量导入
//!
//! 选择文件只在本地校验（恰好一个文件、扩展名、大小上限），提交时才上传。
//! 上传为 multipart/form-data，字段名 `file`；解析在服务端完成。
//! 结果中 `errors` 为空时关闭弹窗并刷新列表，否则保持打开并逐行展示错误。

use log::{info, warn};
use plantdoc_shared::protocol::ImportTarget;
use plantdoc_shared::ImportResult;

use crate::error::ApiResult;
use crate::notice::Notice;
use crate::pipeline::ApiClient;
use crate::request::{HttpClient, MultipartForm};

pub const FILE_FIELD: &str = "file";
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];
/// `<input accept=...>` 的取值
pub const ACCEPT_ATTR: &str = ".csv,.xlsx,.xls";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Please choose a file to import.")]
    NoFile,
    #[error("Only one file can be imported at a time.")]
    MultipleFiles,
    #[error("Unsupported file type '{0}', use .csv, .xlsx or .xls.")]
    UnsupportedExtension(String),
    #[error("File is too large ({size} bytes, limit {max} bytes).")]
    TooLarge { size: u64, max: u64 },
}

/// 待上传的文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFile {
    pub name: String,
    pub size: u64,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// 选择的文件元信息（尚未读取内容）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    pub size: u64,
}

fn extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    (!stem.is_empty()).then(|| ext.to_ascii_lowercase())
}

/// 校验拖拽或点击选择的文件列表
pub fn validate_selection(files: &[FileMeta], max_bytes: u64) -> Result<FileMeta, SelectionError> {
    let file = match files {
        [] => return Err(SelectionError::NoFile),
        [file] => file,
        _ => return Err(SelectionError::MultipleFiles),
    };
    let ext = extension(&file.name).unwrap_or_default();
    if !ACCEPTED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(SelectionError::UnsupportedExtension(file.name.clone()));
    }
    if file.size > max_bytes {
        return Err(SelectionError::TooLarge {
            size: file.size,
            max: max_bytes,
        });
    }
    Ok(file.clone())
}

// =========================================================
// 模板
// =========================================================

/// 导入模板说明
pub struct ImportTemplate {
    pub target: ImportTarget,
    pub file_name: &'static str,
}

impl ImportTemplate {
    pub fn for_target(target: ImportTarget) -> Self {
        let file_name = match target {
            ImportTarget::Diseases => "disease_import_template.csv",
            ImportTarget::ActivityKeywords => "activity_keyword_import_template.csv",
        };
        Self { target, file_name }
    }

    pub fn required_columns(&self) -> &'static [&'static str] {
        self.target.required_columns()
    }

    pub fn optional_columns(&self) -> &'static [&'static str] {
        self.target.optional_columns()
    }

    /// 模板 CSV 的表头行
    pub fn header_csv(&self) -> String {
        self.required_columns()
            .iter()
            .chain(self.optional_columns())
            .copied()
            .collect::<Vec<_>>()
            .join(",")
    }
}

// =========================================================
// 上传
// =========================================================

impl<C: HttpClient> ApiClient<C> {
    pub async fn import_file(&self, target: ImportTarget, file: &ImportFile) -> ApiResult<ImportResult> {
        let form = MultipartForm::new().file(
            FILE_FIELD,
            &file.name,
            file.content_type.as_deref(),
            file.bytes.clone(),
        );
        self.send_multipart(target.path(), form)
            .await
            .map_err(|e| e.in_op_with("import.upload", file.name.clone()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    /// 所有行导入成功
    Imported(ImportResult),
    /// 部分行失败，成功的行已写入
    Partial(ImportResult),
    Failed(Notice),
}

pub async fn run_import<C: HttpClient>(
    api: &ApiClient<C>,
    target: ImportTarget,
    file: &ImportFile,
) -> ImportOutcome {
    match api.import_file(target, file).await {
        Ok(result) if result.is_clean() => {
            info!("imported {} rows from {}", result.success, file.name);
            ImportOutcome::Imported(result)
        }
        Ok(result) => {
            warn!(
                "import of {} finished with {} failed rows",
                file.name,
                result.errors.len()
            );
            ImportOutcome::Partial(result)
        }
        Err(e) => ImportOutcome::Failed(e.notice()),
    }
}

impl ImportOutcome {
    pub fn summary(&self) -> Option<String> {
        match self {
            ImportOutcome::Imported(r) | ImportOutcome::Partial(r) => Some(format!(
                "Imported {} of {} rows",
                r.success,
                r.total.max(r.success)
            )),
            ImportOutcome::Failed(_) => None,
        }
    }
}

/// 导入弹窗状态
#[derive(Debug, Clone, Default)]
pub struct ImportDialog {
    pub open: bool,
    pub selected: Option<FileMeta>,
    pub selection_error: Option<SelectionError>,
    pub uploading: bool,
    pub result: Option<ImportResult>,
    /// 每次选择递增，用来丢弃过期的文件读取结果
    selection: u64,
}

impl ImportDialog {
    pub fn open(&mut self) {
        *self = Self {
            open: true,
            selection: self.selection.wrapping_add(1),
            ..Self::default()
        };
    }

    pub fn close(&mut self) {
        self.open = false;
        self.uploading = false;
    }

    /// 本地选择，不发请求
    ///
    /// 通过校验时返回本次选择的序号，读取完成后用 [`ImportDialog::is_current`] 核对。
    pub fn select(&mut self, files: &[FileMeta], max_bytes: u64) -> Option<u64> {
        self.selection = self.selection.wrapping_add(1);
        match validate_selection(files, max_bytes) {
            Ok(file) => {
                self.selected = Some(file);
                self.selection_error = None;
                self.result = None;
                Some(self.selection)
            }
            Err(e) => {
                self.selected = None;
                self.selection_error = Some(e);
                None
            }
        }
    }

    /// 该序号仍是弹窗里当前显示的选择
    pub fn is_current(&self, selection: u64) -> bool {
        self.open && self.selected.is_some() && self.selection == selection
    }

    pub fn can_submit(&self) -> bool {
        self.open && self.selected.is_some() && !self.uploading
    }

    pub fn begin_upload(&mut self) -> bool {
        if !self.can_submit() {
            return false;
        }
        self.uploading = true;
        true
    }

    /// 应用上传结果，返回是否应触发 `on_success`
    pub fn finish(&mut self, outcome: &ImportOutcome) -> bool {
        if !self.open {
            return false;
        }
        self.uploading = false;
        match outcome {
            ImportOutcome::Imported(_) => {
                self.result = None;
                self.selected = None;
                self.open = false;
                true
            }
            ImportOutcome::Partial(result) => {
                self.result = Some(result.clone());
                false
            }
            ImportOutcome::Failed(_) => false,
        }
    }

    /// 错误表：每个失败行一条 (行号, 消息)
    pub fn error_rows(&self) -> Vec<(u32, String)> {
        self.result
            .as_ref()
            .map(|r| r.errors.iter().map(|e| (e.row, e.message.clone())).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::{BASE, client_with_token, mock};
    use serde_json::json;

    fn meta(name: &str, size: u64) -> FileMeta {
        FileMeta {
            name: name.into(),
            size,
        }
    }

    fn csv_file() -> ImportFile {
        ImportFile {
            name: "diseases.csv".into(),
            size: 64,
            content_type: Some("text/csv".into()),
            bytes: b"name,class_name,type\nLeaf Spot,leaf_spot,BENH NAM\n".to_vec(),
        }
    }

    #[test]
    fn selection_rules() {
        let max = 1024;
        assert_eq!(validate_selection(&[], max), Err(SelectionError::NoFile));
        assert_eq!(
            validate_selection(&[meta("a.csv", 1), meta("b.csv", 1)], max),
            Err(SelectionError::MultipleFiles)
        );
        assert!(matches!(
            validate_selection(&[meta("report.pdf", 1)], max),
            Err(SelectionError::UnsupportedExtension(_))
        ));
        assert!(matches!(
            validate_selection(&[meta(".csv", 1)], max),
            Err(SelectionError::UnsupportedExtension(_))
        ));
        assert_eq!(
            validate_selection(&[meta("big.XLSX", 2048)], max),
            Err(SelectionError::TooLarge { size: 2048, max })
        );
        assert_eq!(validate_selection(&[meta("ok.xls", 10)], max), Ok(meta("ok.xls", 10)));
    }

    #[test]
    fn superseded_selection_is_not_current() {
        let mut dialog = ImportDialog::default();
        dialog.open();

        let first = dialog.select(&[meta("a.csv", 64)], 1024).unwrap();
        let second = dialog.select(&[meta("b.csv", 64)], 1024).unwrap();
        assert!(!dialog.is_current(first));
        assert!(dialog.is_current(second));
        assert_eq!(dialog.selected.as_ref().map(|m| m.name.as_str()), Some("b.csv"));

        // 被拒绝的选择同样让之前的读取失效
        assert_eq!(dialog.select(&[meta("c.pdf", 64)], 1024), None);
        assert!(!dialog.is_current(second));

        let third = dialog.select(&[meta("d.csv", 64)], 1024).unwrap();
        dialog.close();
        dialog.open();
        assert!(!dialog.is_current(third));
    }

    #[tokio::test]
    async fn clean_import_closes_dialog_once() {
        let api = client_with_token(Some("abc"));
        mock(&api).mock_response(
            &format!("{}/diseases/import", BASE),
            200,
            json!({ "total": 1, "success": 1, "errors": [] }),
        );

        let mut dialog = ImportDialog::default();
        dialog.open();
        assert!(!dialog.can_submit());
        assert!(dialog.select(&[meta("diseases.csv", 64)], 1024).is_some());
        assert!(dialog.begin_upload());

        let outcome = run_import(&api, ImportTarget::Diseases, &csv_file()).await;
        assert!(dialog.finish(&outcome));
        assert!(!dialog.open);
        assert!(!dialog.finish(&outcome));

        let (_, method, headers, body) = mock(&api).last_request().unwrap();
        assert_eq!(method, "POST");
        assert_eq!(headers.get("Authorization").map(String::as_str), Some("Bearer abc"));
        assert_eq!(body.as_deref(), Some("multipart[file=diseases.csv]"));
    }

    #[tokio::test]
    async fn partial_import_keeps_dialog_open_with_error_rows() {
        let api = client_with_token(Some("abc"));
        mock(&api).mock_response(
            &format!("{}/activity-keywords/import", BASE),
            200,
            json!({ "total": 5, "success": 3, "errors": [
                { "row": 2, "message": "keywordType is invalid" },
                { "row": 5, "message": "ClassName not found" }
            ] }),
        );

        let mut dialog = ImportDialog::default();
        dialog.open();
        dialog.select(&[meta("keywords.xlsx", 64)], 1024);
        dialog.begin_upload();

        let outcome = run_import(&api, ImportTarget::ActivityKeywords, &csv_file()).await;
        assert_eq!(outcome.summary().as_deref(), Some("Imported 3 of 5 rows"));
        assert!(!dialog.finish(&outcome));
        assert!(dialog.open);
        assert_eq!(
            dialog.error_rows(),
            vec![
                (2, "keywordType is invalid".to_string()),
                (5, "ClassName not found".to_string())
            ]
        );
    }

    #[test]
    fn templates_list_columns() {
        let template = ImportTemplate::for_target(ImportTarget::ActivityKeywords);
        assert_eq!(
            template.header_csv(),
            "ClassName,keywordName,keywordType,description,baseDaysOffset,hourTime,timeDuration,frequencyDays"
        );
        assert_eq!(
            ImportTemplate::for_target(ImportTarget::Diseases).required_columns(),
            ["name", "class_name", "type"]
        );
    }
}
