// src/models/dataset.rs

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::common::error::DatasetError;

// --- Linhas cruas das tabelas CSV ---

// orders.csv: id,created_at,vendor_id,customer_id
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRecord {
    pub id: i64,
    pub created_at: String,
    pub vendor_id: i64,
    pub customer_id: i64,
}

// --- Structs ---

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub vendor_id: i64,
    pub created_at: String,
    // None quando o created_at não tem o formato esperado: nunca passa em nenhum filtro.
    pub date: Option<NaiveDate>,
}

// Colunas extras (product_id, vat_amount, ...) são ignoradas pelo serde.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderLine {
    pub order_id: i64,
    pub quantity: u64,
    pub full_price_amount: Decimal,
    pub discounted_amount: Decimal,
    pub discount_rate: Decimal,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Commission {
    // Comissões sem data valem para qualquer dia.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub vendor_id: i64,
    pub rate: Decimal,
}

// Carregada mas ainda não usada por nenhuma métrica.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Promotion {
    pub id: i64,
    #[serde(default)]
    pub description: Option<String>,
}

/// Extrai a data do pedido: o trecho antes do primeiro espaço (`' '`) em `created_at`.
/// Tab e outros separadores não contam.
///
/// `"2019-08-01 00:01:02.222"` -> `2019-08-01`
pub fn derive_order_date(created_at: &str) -> Result<NaiveDate, DatasetError> {
    let token = created_at.split(' ').next().unwrap_or_default();

    NaiveDate::parse_from_str(token, "%Y-%m-%d")
        .map_err(|_| DatasetError::MalformedTimestamp(created_at.to_string()))
}

/// Converte as linhas cruas em `Order`, calculando a data de cada pedido.
pub fn derive_dates(records: Vec<OrderRecord>) -> Vec<Order> {
    records
        .into_iter()
        .map(|record| {
            let date = match derive_order_date(&record.created_at) {
                Ok(date) => Some(date),
                Err(e) => {
                    tracing::warn!("Pedido {} ignorado nos filtros: {}", record.id, e);
                    None
                }
            };

            Order {
                id: record.id,
                customer_id: record.customer_id,
                vendor_id: record.vendor_id,
                created_at: record.created_at,
                date,
            }
        })
        .collect()
}

// O snapshot completo carregado da fonte de dados. Imutável depois do load.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub orders: Vec<Order>,
    pub order_lines: Vec<OrderLine>,
    pub commissions: Vec<Commission>,
    pub promotions: Vec<Promotion>,
}

impl Dataset {
    pub fn new(
        orders: Vec<OrderRecord>,
        order_lines: Vec<OrderLine>,
        commissions: Vec<Commission>,
        promotions: Vec<Promotion>,
    ) -> Self {
        Self {
            orders: derive_dates(orders),
            order_lines,
            commissions,
            promotions,
        }
    }

    /// Visão do dia `date`: referências para os registros que sobrevivem ao filtro.
    pub fn filter_to_date(&self, date: NaiveDate) -> DayView<'_> {
        narrow(
            date,
            self.orders.iter(),
            self.order_lines.iter(),
            self.commissions.iter(),
        )
    }
}

// Um dia filtrado. Não copia nada, só aponta para o Dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DayView<'a> {
    pub date: NaiveDate,
    pub orders: Vec<&'a Order>,
    pub order_lines: Vec<&'a OrderLine>,
    pub commissions: Vec<&'a Commission>,
}

impl<'a> DayView<'a> {
    // Filtrar de novo com a mesma data devolve uma visão igual.
    pub fn filter_to_date(&self, date: NaiveDate) -> DayView<'a> {
        narrow(
            date,
            self.orders.iter().copied(),
            self.order_lines.iter().copied(),
            self.commissions.iter().copied(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

fn narrow<'a>(
    date: NaiveDate,
    orders: impl Iterator<Item = &'a Order>,
    order_lines: impl Iterator<Item = &'a OrderLine>,
    commissions: impl Iterator<Item = &'a Commission>,
) -> DayView<'a> {
    let orders: Vec<&Order> = orders.filter(|o| o.date == Some(date)).collect();

    let order_ids: HashSet<i64> = orders.iter().map(|o| o.id).collect();
    let order_lines = order_lines
        .filter(|line| order_ids.contains(&line.order_id))
        .collect();

    let commissions = commissions
        .filter(|c| c.date.is_none_or(|d| d == date))
        .collect();

    DayView {
        date,
        orders,
        order_lines,
        commissions,
    }
}
