// src/db/dataset_repo.rs

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::{
    common::error::{AppError, DatasetError},
    models::dataset::Dataset,
};

pub const ORDERS_TABLE: &str = "orders";
pub const ORDER_LINES_TABLE: &str = "order_lines";
pub const COMMISSIONS_TABLE: &str = "commissions";
pub const PROMOTIONS_TABLE: &str = "promotions";

// Colunas que precisam estar no cabeçalho. Colunas opcionais (commissions.date,
// promotions.description) e colunas extras ficam de fora.
const ORDERS_COLUMNS: &[&str] = &["id", "created_at", "vendor_id", "customer_id"];
const ORDER_LINES_COLUMNS: &[&str] = &[
    "order_id",
    "quantity",
    "full_price_amount",
    "discounted_amount",
    "discount_rate",
    "total_amount",
];
const COMMISSIONS_COLUMNS: &[&str] = &["vendor_id", "rate"];
const PROMOTIONS_COLUMNS: &[&str] = &["id"];

// O repositório das tabelas do relatório, responsável pela leitura dos arquivos CSV
#[derive(Clone)]
pub struct DatasetRepository {
    data_dir: PathBuf,
}

impl DatasetRepository {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Lê as quatro tabelas de uma vez. A leitura é bloqueante.
    pub fn load(&self) -> Result<Dataset, DatasetError> {
        let orders = self.read_table(ORDERS_TABLE, ORDERS_COLUMNS)?;
        let order_lines = self.read_table(ORDER_LINES_TABLE, ORDER_LINES_COLUMNS)?;
        let commissions = self.read_table(COMMISSIONS_TABLE, COMMISSIONS_COLUMNS)?;
        let promotions = self.read_table(PROMOTIONS_TABLE, PROMOTIONS_COLUMNS)?;

        let dataset = Dataset::new(orders, order_lines, commissions, promotions);

        tracing::debug!(
            orders = dataset.orders.len(),
            order_lines = dataset.order_lines.len(),
            commissions = dataset.commissions.len(),
            promotions = dataset.promotions.len(),
            "Tabelas carregadas de {}",
            self.data_dir.display()
        );

        Ok(dataset)
    }

    // Mesma coisa que o `load`, mas fora das threads do runtime.
    pub async fn load_async(&self) -> Result<Dataset, AppError> {
        let repo = self.clone();
        let dataset = tokio::task::spawn_blocking(move || repo.load())
            .await
            .map_err(anyhow::Error::from)??;

        Ok(dataset)
    }

    fn read_table<T: DeserializeOwned>(
        &self,
        table: &'static str,
        columns: &[&'static str],
    ) -> Result<Vec<T>, DatasetError> {
        let path = self.data_dir.join(format!("{table}.csv"));

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|source| DatasetError::DataUnavailable { table, source })?;

        // Sem isso, um arquivo só com um cabeçalho errado vira uma tabela vazia.
        let headers = reader
            .headers()
            .map_err(|source| DatasetError::DataUnavailable { table, source })?;
        if let Some(&column) = columns.iter().find(|c| !headers.iter().any(|h| h == **c)) {
            return Err(DatasetError::MissingColumn { table, column });
        }

        reader
            .deserialize()
            .collect::<Result<Vec<T>, _>>()
            .map_err(|source| DatasetError::DataUnavailable { table, source })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::fs;

    pub(crate) fn write_tables(dir: &Path) {
        fs::write(
            dir.join("orders.csv"),
            "id,created_at,vendor_id,customer_id\n\
             1,2019-08-01 00:01:52.531,1,101\n\
             2,2019-08-01 00:12:32.123,2,102\n\
             3,2019-08-01 10:05:00.000,3,103\n\
             4,2019-08-02 09:00:00.000,1,101\n",
        )
        .unwrap();
        fs::write(
            dir.join("order_lines.csv"),
            "order_id,product_id,product_description,product_price,product_vat_rate,discount_rate,quantity,full_price_amount,discounted_amount,vat_amount,total_amount\n\
             1,10,Caneca,5,0.2,0.2,2,10,8,1.6,16\n\
             1,11,Camiseta,20,0.2,0.1,3,20,18,3.6,54\n\
             2,12,Bola,15,0.2,0.2,4,15,12,2.4,48\n\
             3,13,Meia,5,0.2,0.0,1,5,5,1,5\n\
             4,10,Caneca,5,0.2,0.0,1,5,5,1,5\n",
        )
        .unwrap();
        fs::write(
            dir.join("commissions.csv"),
            "date,vendor_id,rate\n\
             2019-08-01,1,0.1\n\
             2019-08-01,2,0.2\n\
             2019-08-01,3,0.15\n\
             2019-08-02,1,0.5\n",
        )
        .unwrap();
        fs::write(
            dir.join("promotions.csv"),
            "id,description\n1,Promoção de inverno\n",
        )
        .unwrap();
    }

    #[test]
    fn loads_all_tables_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        write_tables(dir.path());

        let dataset = DatasetRepository::new(dir.path()).load().unwrap();

        assert_eq!(dataset.orders.len(), 4);
        assert_eq!(dataset.order_lines.len(), 5);
        assert_eq!(dataset.commissions.len(), 4);
        assert_eq!(dataset.promotions.len(), 1);
        assert_eq!(dataset.order_lines[1].total_amount, dec!(54));
        assert!(dataset.orders.iter().all(|o| o.date.is_some()));
    }

    #[test]
    fn commissions_without_date_column_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        write_tables(dir.path());
        fs::write(dir.path().join("commissions.csv"), "vendor_id,rate\n1,0.1\n").unwrap();

        let dataset = DatasetRepository::new(dir.path()).load().unwrap();
        assert_eq!(dataset.commissions[0].date, None);
        assert_eq!(dataset.commissions[0].rate, dec!(0.1));
    }

    #[test]
    fn missing_table_is_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        write_tables(dir.path());
        fs::remove_file(dir.path().join("promotions.csv")).unwrap();

        let err = DatasetRepository::new(dir.path()).load().unwrap_err();
        assert!(matches!(
            err,
            DatasetError::DataUnavailable { table: PROMOTIONS_TABLE, .. }
        ));
    }

    #[test]
    fn malformed_table_is_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        write_tables(dir.path());
        fs::write(
            dir.path().join("order_lines.csv"),
            "order_id,quantity,full_price_amount,discounted_amount,discount_rate,total_amount\n\
             1,dois,10,8,0.2,16\n",
        )
        .unwrap();

        let err = DatasetRepository::new(dir.path()).load().unwrap_err();
        assert!(matches!(
            err,
            DatasetError::DataUnavailable { table: ORDER_LINES_TABLE, .. }
        ));
    }

    #[test]
    fn header_without_required_columns_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_tables(dir.path());
        fs::write(dir.path().join("orders.csv"), "foo\n").unwrap();

        let err = DatasetRepository::new(dir.path()).load().unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MissingColumn { table: ORDERS_TABLE, column: "id" }
        ));
    }

    #[test]
    fn missing_single_column_is_named() {
        let dir = tempfile::tempdir().unwrap();
        write_tables(dir.path());
        fs::write(dir.path().join("commissions.csv"), "date,vendor_id\n2019-08-01,1\n").unwrap();

        let err = DatasetRepository::new(dir.path()).load().unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MissingColumn { table: COMMISSIONS_TABLE, column: "rate" }
        ));
    }
}
