//! 文件选择与读取
//!
//! 点击选择（`<input type=file>`）和拖拽（`DataTransfer`）都得到 `FileList`，
//! 元信息先交给核心库做本地校验，通过后再读取字节。

use plantdoc_admin::import::{FileMeta, ImportFile};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FileList};

/// 展开 `FileList`，同时返回元信息与句柄
pub fn selected_files(list: Option<FileList>) -> Vec<(FileMeta, File)> {
    let Some(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|file| {
            let meta = FileMeta {
                name: file.name(),
                size: file.size() as u64,
            };
            (meta, file)
        })
        .collect()
}

/// 读取整个文件内容
pub async fn read_import_file(file: &File) -> Result<ImportFile, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("could not read {}: {:?}", file.name(), e))?;
    let buffer: js_sys::ArrayBuffer = buffer
        .dyn_into()
        .map_err(|_| format!("could not read {}", file.name()))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    let content_type = file.type_();

    Ok(ImportFile {
        name: file.name(),
        size: bytes.len() as u64,
        content_type: (!content_type.is_empty()).then_some(content_type),
        bytes,
    })
}
