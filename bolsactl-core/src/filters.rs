//! Global sidebar filters (category, discipline, state, period, paid value)
//!
//! The filters are parsed from repeated query-string keys and turned into a
//! bound-parameter predicate over the joined payment view:
//!
//! ```text
//! FROM pagamento p
//! LEFT JOIN categoria c   ON p.id_categoria = c.id_categoria
//! LEFT JOIN modalidade m  ON p.id_modalidade = m.id_modalidade
//! LEFT JOIN atleta a      ON p.cpf = a.cpf
//! LEFT JOIN municipio mu  ON a.id_municipio = mu.id_municipio
//! ```

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{BolsaError, Result};
use crate::sql::Predicate;

pub const KEY_CATEGORY: &str = "categoria";
pub const KEY_DISCIPLINE: &str = "modalidade";
pub const KEY_STATE: &str = "uf";
pub const KEY_DATE_FROM: &str = "data_inicio";
pub const KEY_DATE_TO: &str = "data_fim";
pub const KEY_VALUE_MIN: &str = "valor_min";
pub const KEY_VALUE_MAX: &str = "valor_max";

/// Filters applied to the overview page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlobalFilters {
    pub categories: Vec<String>,
    pub disciplines: Vec<String>,
    pub states: Vec<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Lower bound on `valor_pago`; ignored unless > 0
    pub value_min: Option<f64>,
    /// Upper bound on `valor_pago`; 0 means no limit
    pub value_max: Option<f64>,
}

impl GlobalFilters {
    /// Parse from decoded `key=value` pairs. Keys may repeat for multi-selects;
    /// blank values and unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filters = Self::default();

        for (key, value) in pairs {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                KEY_CATEGORY => push_unique(&mut filters.categories, value),
                KEY_DISCIPLINE => push_unique(&mut filters.disciplines, value),
                KEY_STATE => push_unique(&mut filters.states, value),
                KEY_DATE_FROM => filters.date_from = Some(parse_date(KEY_DATE_FROM, value)?),
                KEY_DATE_TO => filters.date_to = Some(parse_date(KEY_DATE_TO, value)?),
                KEY_VALUE_MIN => filters.value_min = Some(parse_amount(KEY_VALUE_MIN, value)?),
                KEY_VALUE_MAX => filters.value_max = Some(parse_amount(KEY_VALUE_MAX, value)?),
                _ => {}
            }
        }

        Ok(filters)
    }

    /// True when no filter narrows the data
    pub fn is_empty(&self) -> bool {
        self.predicate().is_empty()
    }

    /// Bound-parameter predicate over the joined view
    pub fn predicate(&self) -> Predicate {
        let mut pred = Predicate::new()
            .is_in("c.categoria", self.categories.iter().map(String::as_str))
            .is_in("m.modalidade", self.disciplines.iter().map(String::as_str))
            .is_in("mu.uf", self.states.iter().map(String::as_str));

        if let Some(from) = self.date_from {
            pred = pred.at_least("p.data_pagamento", from.format("%Y-%m-%d").to_string());
        }
        if let Some(to) = self.date_to {
            pred = pred.at_most("p.data_pagamento", to.format("%Y-%m-%d").to_string());
        }
        if let Some(min) = self.value_min.filter(|v| *v > 0.0) {
            pred = pred.at_least("p.valor_pago", min);
        }
        if let Some(max) = self.value_max.filter(|v| *v > 0.0) {
            pred = pred.at_most("p.valor_pago", max);
        }

        pred
    }
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| BolsaError::invalid_filter(field, format!("expected YYYY-MM-DD, got '{}'", value)))
}

fn parse_amount(field: &'static str, value: &str) -> Result<f64> {
    let amount: f64 = value
        .replace(',', ".")
        .parse()
        .map_err(|_| BolsaError::invalid_filter(field, format!("expected a number, got '{}'", value)))?;

    if !amount.is_finite() || amount < 0.0 {
        return Err(BolsaError::invalid_filter(field, "must be zero or positive"));
    }
    Ok(amount)
}
