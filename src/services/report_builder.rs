// src/services/report_builder.rs
//
// Métricas do relatório diário. Cada função recebe só o que precisa e
// devolve um valor; o `Metrics` é montado uma única vez em `build_report`.

use std::collections::{BTreeMap, HashMap, HashSet};

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    common::error::ReportError,
    models::{
        dataset::{Commission, DayView, Order, OrderLine},
        report::{CommissionSummary, Metrics},
    },
};

/// Casas decimais das médias. Com essa escala o valor volta idêntico depois de
/// passar pelo JSON como número (f64).
pub const AVERAGE_SCALE: u32 = 6;

pub fn order_count(orders: &[&Order]) -> u64 {
    orders.len() as u64
}

pub fn items_sold(order_lines: &[&OrderLine]) -> Result<u64, ReportError> {
    order_lines.iter().try_fold(0u64, |acc, line| {
        acc.checked_add(line.quantity)
            .ok_or(ReportError::Overflow { metric: "items" })
    })
}

pub fn customer_count(orders: &[&Order]) -> u64 {
    let customers: HashSet<i64> = orders.iter().map(|o| o.customer_id).collect();
    customers.len() as u64
}

pub fn total_discount(order_lines: &[&OrderLine]) -> Result<Decimal, ReportError> {
    const METRIC: &str = "total_discount_amount";

    order_lines.iter().try_fold(Decimal::ZERO, |acc, line| {
        let discount = line
            .full_price_amount
            .checked_sub(line.discounted_amount)
            .ok_or(ReportError::Overflow { metric: METRIC })?;
        add(acc, discount, METRIC)
    })
}

/// Média da taxa de desconto ponderada pela quantidade de itens.
pub fn average_discount_rate(
    order_lines: &[&OrderLine],
    items_sold: u64,
) -> Result<Decimal, ReportError> {
    const METRIC: &str = "discount_rate_avg";

    let weighted = order_lines.iter().try_fold(Decimal::ZERO, |acc, line| {
        let weight = mul(line.discount_rate, Decimal::from(line.quantity), METRIC)?;
        add(acc, weight, METRIC)
    })?;

    average(weighted, items_sold, METRIC)
}

/// Soma dos totais das linhas dividida pelo número de pedidos (não de linhas).
pub fn average_order_total(
    order_lines: &[&OrderLine],
    order_count: u64,
) -> Result<Decimal, ReportError> {
    const METRIC: &str = "order_total_avg";

    let total = order_lines
        .iter()
        .try_fold(Decimal::ZERO, |acc, line| add(acc, line.total_amount, METRIC))?;

    average(total, order_count, METRIC)
}

/// Total de comissões do dia.
///
/// 1. Soma o `total_amount` das linhas por pedido.
/// 2. Junta com os pedidos para descobrir o vendedor e soma por vendedor.
///    Linhas de pedidos que não estão em `orders` ficam de fora.
/// 3. Junta com as comissões pelo `vendor_id`. Vendedor sem taxa contribui com zero.
/// 4. Soma `total_do_vendedor * taxa`.
pub fn commission_total(
    order_lines: &[&OrderLine],
    orders: &[&Order],
    commissions: &[&Commission],
) -> Result<Decimal, ReportError> {
    const METRIC: &str = "commissions.total";

    let mut order_totals: HashMap<i64, Decimal> = HashMap::new();
    for line in order_lines {
        let total = order_totals.entry(line.order_id).or_default();
        *total = add(*total, line.total_amount, METRIC)?;
    }

    let vendor_by_order: HashMap<i64, i64> = orders.iter().map(|o| (o.id, o.vendor_id)).collect();

    let mut vendor_totals: BTreeMap<i64, Decimal> = BTreeMap::new();
    for (order_id, order_total) in order_totals {
        if let Some(vendor_id) = vendor_by_order.get(&order_id) {
            let total = vendor_totals.entry(*vendor_id).or_default();
            *total = add(*total, order_total, METRIC)?;
        }
    }

    // Taxas repetidas para o mesmo vendedor são todas aplicadas, como num left join.
    let mut rates: HashMap<i64, Decimal> = HashMap::new();
    for commission in commissions {
        match rates.get_mut(&commission.vendor_id) {
            Some(rate) => {
                tracing::warn!("Vendedor {} com mais de uma comissão no dia", commission.vendor_id);
                *rate = add(*rate, commission.rate, METRIC)?;
            }
            None => {
                rates.insert(commission.vendor_id, commission.rate);
            }
        }
    }

    vendor_totals
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, (vendor_id, total)| {
            let rate = rates.get(&vendor_id).copied().unwrap_or(Decimal::ZERO);
            add(acc, mul(total, rate, METRIC)?, METRIC)
        })
}

pub fn average_commission(commission_total: Decimal, order_count: u64) -> Result<Decimal, ReportError> {
    average(commission_total, order_count, "commissions.order_average")
}

fn add(a: Decimal, b: Decimal, metric: &'static str) -> Result<Decimal, ReportError> {
    a.checked_add(b).ok_or(ReportError::Overflow { metric })
}

fn mul(a: Decimal, b: Decimal, metric: &'static str) -> Result<Decimal, ReportError> {
    a.checked_mul(b).ok_or(ReportError::Overflow { metric })
}

fn average(total: Decimal, count: u64, metric: &'static str) -> Result<Decimal, ReportError> {
    if count == 0 {
        return Err(ReportError::DivisionByZeroInAggregate { metric });
    }

    let value = total
        .checked_div(Decimal::from(count))
        .ok_or(ReportError::Overflow { metric })?;

    Ok(value.round_dp_with_strategy(AVERAGE_SCALE, RoundingStrategy::MidpointAwayFromZero))
}

pub fn build_report(view: &DayView<'_>) -> Result<Metrics, ReportError> {
    let orders = order_count(&view.orders);
    let items = items_sold(&view.order_lines)?;
    let commissions = commission_total(&view.order_lines, &view.orders, &view.commissions)?;

    Ok(Metrics {
        customers: customer_count(&view.orders),
        total_discount_amount: total_discount(&view.order_lines)?,
        items,
        order_total_avg: average_order_total(&view.order_lines, orders)?,
        discount_rate_avg: average_discount_rate(&view.order_lines, items)?,
        commissions: CommissionSummary {
            total: commissions,
            order_average: average_commission(commissions, orders)?,
        },
    })
}
