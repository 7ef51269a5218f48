//! Historical asset prices: merge per-asset series on a shared date and
//! summarise growth over a year range.
//!
//! A price absent from a series stays `None` in the merged table for every
//! asset alike; nothing is zero-filled.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Asset {
    #[serde(alias = "gold_price")]
    Gold,
    #[serde(alias = "sp-500", alias = "sp500_price")]
    Sp500,
    #[serde(alias = "btc", alias = "bitcoin_price")]
    Bitcoin,
}

impl Asset {
    pub fn ticker(self) -> &'static str {
        match self {
            Asset::Gold => "GC=F",
            Asset::Sp500 => "^GSPC",
            Asset::Bitcoin => "BTC-USD",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Asset::Gold => "Gold",
            Asset::Sp500 => "S&P 500",
            Asset::Bitcoin => "Bitcoin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetSeries {
    pub asset: Asset,
    #[serde(default)]
    pub points: Vec<PricePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedRow {
    pub date: NaiveDate,
    pub prices: BTreeMap<Asset, Option<f64>>,
}

impl MergedRow {
    pub fn price(&self, asset: Asset) -> Option<f64> {
        self.prices.get(&asset).copied().flatten()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetReturn {
    pub asset: Asset,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_price: f64,
    pub end_price: f64,
    pub percent_change: Option<f64>,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("start year {start} is after end year {end}")]
    InvalidYearRange { start: i32, end: i32 },
    #[error("no price data between {start} and {end}")]
    NoDataInRange { start: i32, end: i32 },
}

/// Full outer join of every series on date. Each row holds an entry for every
/// asset that appears in `series`, even when its series is empty.
pub fn merge_on_date(series: &[AssetSeries]) -> Vec<MergedRow> {
    let assets: Vec<Asset> = series.iter().map(|s| s.asset).collect();
    let mut by_date: BTreeMap<NaiveDate, BTreeMap<Asset, Option<f64>>> = BTreeMap::new();

    for s in series {
        for point in &s.points {
            let prices = by_date
                .entry(point.date)
                .or_insert_with(|| assets.iter().map(|&a| (a, None)).collect());
            // non-finite closes count as missing
            let close = point.close.is_finite().then_some(point.close);
            prices.insert(s.asset, close);
        }
    }

    by_date
        .into_iter()
        .map(|(date, prices)| MergedRow { date, prices })
        .collect()
}

pub fn year_bounds(rows: &[MergedRow]) -> Option<(i32, i32)> {
    let first = rows.iter().map(|r| r.date.year()).min()?;
    let last = rows.iter().map(|r| r.date.year()).max()?;
    Some((first, last))
}

/// Default window: the last ten years of available data.
pub fn default_year_range(rows: &[MergedRow]) -> Option<(i32, i32)> {
    let (first, last) = year_bounds(rows)?;
    Some(((last - 10).max(first), last))
}

pub fn filter_years(
    rows: &[MergedRow],
    start: i32,
    end: i32,
) -> Result<Vec<MergedRow>, HistoryError> {
    if start > end {
        return Err(HistoryError::InvalidYearRange { start, end });
    }

    let filtered: Vec<MergedRow> = rows
        .iter()
        .filter(|r| (start..=end).contains(&r.date.year()))
        .cloned()
        .collect();

    if filtered.is_empty() {
        return Err(HistoryError::NoDataInRange { start, end });
    }
    Ok(filtered)
}

/// Growth between the first and last available price of `asset` in `rows`.
pub fn asset_return(rows: &[MergedRow], asset: Asset) -> Option<AssetReturn> {
    let mut priced = rows
        .iter()
        .filter_map(|r| r.price(asset).map(|price| (r.date, price)));
    let (start_date, start_price) = priced.next()?;
    let (end_date, end_price) = priced.last().unwrap_or((start_date, start_price));

    let percent_change =
        (start_price != 0.0).then(|| (end_price - start_price) / start_price * 100.0);

    Some(AssetReturn {
        asset,
        start_date,
        end_date,
        start_price,
        end_price,
        percent_change,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).expect("valid date")
    }

    fn series(asset: Asset, points: &[(i32, u32, f64)]) -> AssetSeries {
        AssetSeries {
            asset,
            points: points
                .iter()
                .map(|&(y, m, close)| PricePoint {
                    date: date(y, m),
                    close,
                })
                .collect(),
        }
    }

    fn sample_rows() -> Vec<MergedRow> {
        merge_on_date(&[
            series(
                Asset::Gold,
                &[(2012, 1, 1_600.0), (2013, 1, 1_650.0), (2020, 1, 1_500.0)],
            ),
            series(
                Asset::Sp500,
                &[(2012, 1, 1_300.0), (2013, 1, 1_500.0), (2020, 1, 3_200.0)],
            ),
            series(Asset::Bitcoin, &[(2013, 1, 13.0), (2020, 1, 9_000.0)]),
        ])
    }

    #[test]
    fn merge_keeps_every_date_and_marks_gaps_as_missing() {
        let rows = sample_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].date, date(2012, 1));
        assert_eq!(rows[0].price(Asset::Gold), Some(1_600.0));
        assert_eq!(rows[0].price(Asset::Bitcoin), None);
        assert_eq!(rows[0].prices.get(&Asset::Bitcoin), Some(&None));
        assert_eq!(rows[2].price(Asset::Bitcoin), Some(9_000.0));
    }

    #[test]
    fn merge_treats_gaps_in_any_series_alike() {
        let rows = merge_on_date(&[
            series(Asset::Gold, &[(2015, 1, 1_200.0)]),
            series(Asset::Sp500, &[(2015, 2, 2_000.0)]),
        ]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].price(Asset::Sp500), None);
        assert_eq!(rows[1].price(Asset::Gold), None);
    }

    #[test]
    fn merge_tolerates_empty_series() {
        let rows = merge_on_date(&[
            series(Asset::Gold, &[]),
            series(Asset::Sp500, &[(2015, 1, 2_000.0)]),
        ]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].prices.len(), 2);
        assert_eq!(rows[0].price(Asset::Gold), None);

        assert!(merge_on_date(&[]).is_empty());
    }

    #[test]
    fn merge_drops_non_finite_closes() {
        let rows = merge_on_date(&[series(Asset::Gold, &[(2015, 1, f64::NAN)])]);
        assert_eq!(rows[0].price(Asset::Gold), None);
    }

    #[test]
    fn year_bounds_and_default_range() {
        let rows = sample_rows();
        assert_eq!(year_bounds(&rows), Some((2012, 2020)));
        assert_eq!(default_year_range(&rows), Some((2012, 2020)));
        assert_eq!(year_bounds(&[]), None);

        let long = merge_on_date(&[series(
            Asset::Gold,
            &[(1995, 1, 380.0), (2024, 1, 2_050.0)],
        )]);
        assert_eq!(default_year_range(&long), Some((2014, 2024)));
    }

    #[test]
    fn filter_years_is_inclusive() {
        let rows = sample_rows();
        let filtered = filter_years(&rows, 2013, 2020).expect("rows in range");
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].date, date(2013, 1));
    }

    #[test]
    fn filter_years_rejects_inverted_and_empty_ranges() {
        let rows = sample_rows();
        assert_eq!(
            filter_years(&rows, 2020, 2013),
            Err(HistoryError::InvalidYearRange {
                start: 2020,
                end: 2013
            })
        );
        assert_eq!(
            filter_years(&rows, 2014, 2019),
            Err(HistoryError::NoDataInRange {
                start: 2014,
                end: 2019
            })
        );
    }

    #[test]
    fn asset_return_uses_first_and_last_available_price() {
        let rows = sample_rows();
        let btc = asset_return(&rows, Asset::Bitcoin).expect("bitcoin has prices");
        assert_eq!(btc.start_date, date(2013, 1));
        assert_eq!(btc.end_date, date(2020, 1));
        assert_approx(btc.percent_change.expect("non-zero start"), (9_000.0 - 13.0) / 13.0 * 100.0);

        let gold = asset_return(&rows, Asset::Gold).expect("gold has prices");
        assert_approx(gold.percent_change.expect("non-zero start"), -6.25);
    }

    #[test]
    fn asset_return_is_none_without_prices_and_flags_zero_start() {
        let rows = merge_on_date(&[
            series(Asset::Gold, &[(2015, 1, 0.0), (2016, 1, 10.0)]),
            series(Asset::Sp500, &[]),
        ]);
        assert!(asset_return(&rows, Asset::Sp500).is_none());
        assert!(asset_return(&rows, Asset::Bitcoin).is_none());

        let gold = asset_return(&rows, Asset::Gold).expect("gold has prices");
        assert_eq!(gold.percent_change, None);
        assert_eq!(gold.end_price, 10.0);
    }

    #[test]
    fn asset_return_with_single_price_has_no_change() {
        let rows = merge_on_date(&[series(Asset::Gold, &[(2015, 1, 1_000.0)])]);
        let gold = asset_return(&rows, Asset::Gold).expect("gold has a price");
        assert_eq!(gold.start_date, gold.end_date);
        assert_eq!(gold.percent_change, Some(0.0));
    }
}
