use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use super::config::CsvConf;
use crate::error::{ConduitError, ConduitResult};
use crate::model::{DataContext, Dataset, Record, SourceType};
use crate::registry::ProtocolRegistry;
use crate::service::SourceService;

/// Reads delimited text from a file or HTTP(S) resource. Every value is a string.
pub struct CsvSourceService {
    protocols: Arc<ProtocolRegistry>,
}

impl CsvSourceService {
    pub fn new(protocols: Arc<ProtocolRegistry>) -> Self {
        Self { protocols }
    }

    async fn load(&self, context: &DataContext) -> ConduitResult<(CsvConf, bytes::Bytes)> {
        // 先校验属性，再打开资源
        let conf = CsvConf::from_context(context)?;
        let resource = self.initialize(context).await?.into_resource()?;
        debug!("[csv] read {} with {:?}", resource.describe(), conf);
        let bytes = resource.read_bytes().await?;
        Ok((conf, bytes))
    }
}

#[async_trait]
impl SourceService for CsvSourceService {
    fn source_type(&self) -> SourceType {
        SourceType::Csv
    }

    fn protocols(&self) -> &ProtocolRegistry {
        &self.protocols
    }

    async fn retrieve(&self, context: &DataContext) -> ConduitResult<Vec<Record>> {
        let (conf, bytes) = self.load(context).await?;
        let mut records = Vec::new();
        decode_records(&bytes, &conf, |record| records.push(record))?;
        Ok(records)
    }

    async fn retrieve_dataset(&self, context: &DataContext) -> ConduitResult<Dataset> {
        let (conf, bytes) = self.load(context).await?;
        let mut dataset = Dataset::new();
        decode_records(&bytes, &conf, |record| dataset.add_row(record))?;
        Ok(dataset)
    }
}

/// Decodes `input` and hands each row to `emit`; returns the row count.
///
/// With an explicit column list every line is data, otherwise the first line
/// is the header. Rows wider than the header fail the whole decode; shorter
/// rows carry only the columns they have.
pub fn decode_records(
    input: &[u8],
    conf: &CsvConf,
    mut emit: impl FnMut(Record),
) -> ConduitResult<usize> {
    let mut reader = ::csv::ReaderBuilder::new()
        .delimiter(conf.delimiter)
        .has_headers(conf.columns.is_none())
        .flexible(true)
        .from_reader(input);

    let header: Vec<String> = match &conf.columns {
        Some(columns) => columns.clone(),
        None => reader
            .headers()
            .map_err(|e| ConduitError::format_with("read csv header fail", e))?
            .iter()
            .map(str::to_string)
            .collect(),
    };

    let mut count = 0;
    for row in reader.records() {
        let row = row.map_err(|e| ConduitError::format_with("read csv row fail", e))?;
        if row.len() > header.len() {
            let line = row.position().map_or(0, |p| p.line());
            return Err(ConduitError::format(format!(
                "line {line} has {} fields, header has {}",
                row.len(),
                header.len()
            )));
        }
        let record: Record = header.iter().cloned().zip(row.iter()).collect();
        debug!("[csv] row: {:?}", record);
        emit(record);
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::FileConnector;
    use crate::model::{ColumnType, ContextProperty, Protocol, Value};

    fn explicit(delimiter: u8, columns: &[&str]) -> CsvConf {
        CsvConf {
            delimiter,
            columns: Some(columns.iter().map(|c| c.to_string()).collect()),
        }
    }

    fn decode(input: &str, conf: &CsvConf) -> ConduitResult<Vec<Record>> {
        let mut out = Vec::new();
        decode_records(input.as_bytes(), conf, |r| out.push(r))?;
        Ok(out)
    }

    #[test]
    fn explicit_columns_with_pipe_delimiter() {
        let rows = decode("1|2|3", &explicit(b'|', &["a", "b", "c"])).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0],
            Record::new().with("a", "1").with("b", "2").with("c", "3")
        );
    }

    #[test]
    fn header_row_is_detected_when_no_columns_given() {
        let rows = decode("id,name\n1,ann\n2,bob\n", &CsvConf::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("name"), Some(&Value::from("bob")));
        assert_eq!(rows[0].get("id"), Some(&Value::from("1")));
    }

    #[test]
    fn short_rows_keep_present_columns() {
        let rows = decode("1,2\n3\n", &explicit(b',', &["a", "b"])).unwrap();
        assert_eq!(rows[1], Record::new().with("a", "3"));
    }

    #[test]
    fn wide_rows_fail_the_decode() {
        let err = decode("a,b\n1,2\n1,2,3\n", &CsvConf::default()).expect_err("too wide");
        assert!(matches!(err, ConduitError::Format { .. }));
    }

    #[tokio::test]
    async fn retrieve_dataset_types_every_column_as_string() {
        let path = std::env::temp_dir().join(format!("conduit-csv-{}.csv", std::process::id()));
        std::fs::write(&path, "id;name;age\n1;ann;41\n2;bob;38\n").unwrap();

        let mut protocols = ProtocolRegistry::new();
        protocols.register(Protocol::File, Arc::new(FileConnector::new()));
        let service = CsvSourceService::new(Arc::new(protocols));
        let ctx = DataContext::builder(SourceType::Csv, format!("file://{}", path.display()))
            .property(ContextProperty::Delimiter, ";")
            .build();

        let ds = service.retrieve_dataset(&ctx).await.unwrap();
        let rows = service.retrieve(&ctx).await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records(), rows.as_slice());
        assert!(ds
            .column_definitions()
            .iter()
            .all(|d| d.runtime_type == ColumnType::String));
        assert_eq!(ds.column_definitions()[2].name, "age");
    }

    #[tokio::test]
    async fn invalid_delimiter_fails_before_opening() {
        let service = CsvSourceService::new(Arc::new(ProtocolRegistry::new()));
        let ctx = DataContext::builder(SourceType::Csv, "file:/tmp/none.csv")
            .property(ContextProperty::Delimiter, "")
            .build();
        let err = service.retrieve(&ctx).await.expect_err("empty delimiter");
        assert!(matches!(err, ConduitError::Configuration(_)));
    }

    #[tokio::test]
    async fn unregistered_protocol_is_not_found() {
        let service = CsvSourceService::new(Arc::new(ProtocolRegistry::new()));
        let ctx = DataContext::builder(SourceType::Csv, "file:/tmp/none.csv").build();
        let err = service.retrieve(&ctx).await.expect_err("no connector");
        assert!(err.is_not_found());
    }
}
