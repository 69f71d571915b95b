/// Экспорт табличных данных в CSV (открывается в Excel) и скачивание в браузере
use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// Trait для типов, которые могут быть экспортированы в Excel
pub trait ExcelExportable {
    /// Заголовки колонок в порядке вывода
    fn headers() -> Vec<&'static str>;

    /// Значения одной строки, в том же порядке, что и `headers`
    fn to_csv_row(&self) -> Vec<String>;
}

#[derive(Debug, Error)]
pub enum ExportFileError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV encoding failed: {0}")]
    Encoding(String),

    #[error("Download failed: {0}")]
    Download(String),
}

/// Готовая к скачиванию таблица
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularFile {
    /// Имя файла без расширения
    pub file_name: String,
    pub sheet_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TabularFile {
    pub fn from_items<T: ExcelExportable>(
        file_name: impl Into<String>,
        sheet_name: impl Into<String>,
        items: &[T],
    ) -> Self {
        Self {
            file_name: file_name.into(),
            sheet_name: sheet_name.into(),
            headers: T::headers().into_iter().map(str::to_string).collect(),
            rows: items.iter().map(ExcelExportable::to_csv_row).collect(),
        }
    }

    pub fn file_name_with_extension(&self) -> String {
        format!("{}.csv", self.file_name)
    }

    /// CSV с `;` в качестве разделителя и UTF-8 BOM для корректного
    /// отображения в Excel
    pub fn to_csv(&self) -> Result<String, ExportFileError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| ExportFileError::Encoding(e.to_string()))?;
        let body = String::from_utf8(bytes).map_err(|e| ExportFileError::Encoding(e.to_string()))?;

        let mut content = String::with_capacity(body.len() + 3);
        content.push('\u{FEFF}');
        content.push_str(&body);
        Ok(content)
    }
}

/// Кодирует таблицу и инициирует скачивание
pub fn download_tabular_file(file: &TabularFile) -> Result<(), ExportFileError> {
    let content = file.to_csv()?;
    let blob = create_csv_blob(&content).map_err(ExportFileError::Download)?;
    download_blob(&blob, &file.file_name_with_extension()).map_err(ExportFileError::Download)
}

fn create_csv_blob(content: &str) -> Result<Blob, String> {
    let array = js_sys::Array::new();
    array.push(&wasm_bindgen::JsValue::from_str(content));

    let properties = BlobPropertyBag::new();
    properties.set_type("text/csv;charset=utf-8;");

    Blob::new_with_str_sequence_and_options(&array, &properties)
        .map_err(|e| format!("Failed to create blob: {:?}", e))
}

/// Скачивание через временную ссылку `<a download>`
fn download_blob(blob: &Blob, filename: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window object")?;
    let document = window.document().ok_or("No document object")?;
    let body = document.body().ok_or("No body element")?;

    let url = Url::create_object_url_with_blob(blob)
        .map_err(|e| format!("Failed to create object URL: {:?}", e))?;

    let anchor = document
        .create_element("a")
        .map_err(|e| format!("Failed to create anchor: {:?}", e))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| format!("Failed to cast to anchor: {:?}", e))?;

    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor
        .style()
        .set_property("display", "none")
        .map_err(|e| format!("Failed to set style: {:?}", e))?;

    body.append_child(&anchor)
        .map_err(|e| format!("Failed to append anchor: {:?}", e))?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(|e| format!("Failed to remove anchor: {:?}", e))?;

    Url::revoke_object_url(&url).map_err(|e| format!("Failed to revoke URL: {:?}", e))?;
    log::info!("downloaded {}", filename);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair(&'static str, u32);

    impl ExcelExportable for Pair {
        fn headers() -> Vec<&'static str> {
            vec!["Name", "Count"]
        }

        fn to_csv_row(&self) -> Vec<String> {
            vec![self.0.to_string(), self.1.to_string()]
        }
    }

    #[test]
    fn test_csv_has_bom_and_semicolons() {
        let file = TabularFile::from_items("report", "Sheet", &[Pair("Anu", 3)]);
        let csv = file.to_csv().unwrap();
        assert_eq!(csv, "\u{FEFF}Name;Count\nAnu;3\n");
        assert_eq!(file.file_name_with_extension(), "report.csv");
    }

    #[test]
    fn test_csv_quotes_special_cells() {
        let file = TabularFile::from_items("r", "Sheet", &[Pair("a;b \"c\"", 1)]);
        let csv = file.to_csv().unwrap();
        assert!(csv.ends_with("\"a;b \"\"c\"\"\";1\n"), "{csv}");
    }
}
