//! Overview statistics computed from three concurrent collection fetches.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use resources_sdk::{
    Category, CustomOrder, CustomOrderStatus, Employee, ResourceError, ResourceGateway,
    ResourceKind, decode_all,
};
use serde::Serialize;
use tracing::{debug, instrument};

/// One labelled count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub key: String,
    pub count: usize,
}

impl Bucket {
    fn new(key: impl Into<String>, count: usize) -> Self {
        Self {
            key: key.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Every known custom order status in canonical order, zeros included.
    pub custom_orders_by_status: Vec<Bucket>,
    /// Employees per country, sorted by country.
    pub employees_by_country: Vec<Bucket>,
    /// Category entries per name, sorted by name.
    pub categories: Vec<Bucket>,
    /// Custom orders per creation day, oldest first, keyed `y-m-d`.
    pub custom_orders_by_day: Vec<Bucket>,
    pub total_custom_orders: usize,
    pub total_employees: usize,
    pub total_categories: usize,
}

/// Fetch custom orders, employees and categories concurrently and aggregate.
///
/// # Errors
/// The first fetch or decode error; no partial statistics are returned.
#[instrument(skip_all)]
pub async fn load_dashboard(gateway: &dyn ResourceGateway) -> Result<DashboardStats, ResourceError> {
    let (orders, employees, categories) = tokio::try_join!(
        gateway.list(ResourceKind::CustomOrders),
        gateway.list(ResourceKind::Employees),
        gateway.list(ResourceKind::Categories),
    )?;
    let orders: Vec<CustomOrder> = decode_all(orders)?;
    let employees: Vec<Employee> = decode_all(employees)?;
    let categories: Vec<Category> = decode_all(categories)?;
    debug!(
        orders = orders.len(),
        employees = employees.len(),
        categories = categories.len(),
        "dashboard collections loaded"
    );
    Ok(aggregate(&orders, &employees, &categories))
}

/// Pure aggregation over already loaded collections.
#[must_use]
pub fn aggregate(
    orders: &[CustomOrder],
    employees: &[Employee],
    categories: &[Category],
) -> DashboardStats {
    let custom_orders_by_status = CustomOrderStatus::known()
        .into_iter()
        .map(|status| {
            let count = orders.iter().filter(|o| o.order_status == status).count();
            Bucket::new(status.as_str(), count)
        })
        .collect();

    let employees_by_country = count_by(
        employees
            .iter()
            .filter_map(|e| e.country.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty()),
    );

    let categories_by_name = count_by(categories.iter().map(|c| c.category.as_str()));

    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for date in orders
        .iter()
        .filter_map(|o| o.created_at.as_ref().and_then(|ts| ts.date()))
    {
        *per_day.entry(date).or_default() += 1;
    }
    let custom_orders_by_day = per_day
        .into_iter()
        .map(|(date, count)| Bucket::new(day_key(date), count))
        .collect();

    DashboardStats {
        custom_orders_by_status,
        employees_by_country,
        categories: categories_by_name,
        custom_orders_by_day,
        total_custom_orders: orders.len(),
        total_employees: employees.len(),
        total_categories: categories.len(),
    }
}

fn count_by<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<Bucket> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(key, count)| Bucket::new(key, count))
        .collect()
}

fn day_key(date: NaiveDate) -> String {
    format!("{}-{}-{}", date.year(), date.month(), date.day())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    fn orders() -> Vec<CustomOrder> {
        decode_all(vec![
            json!({"id": 1, "orderStatus": "Pending", "createdAt": [2024, 3, 9, 10, 0]}),
            json!({"id": 2, "orderStatus": "Completed", "createdAt": "2024-03-09T18:30:00"}),
            json!({"id": 3, "orderStatus": "Pending", "createdAt": [2024, 2, 28]}),
            json!({"id": 4, "orderStatus": "Archived"}),
        ])
        .unwrap()
    }

    #[test]
    fn status_counts_cover_every_known_tag() {
        let stats = aggregate(&orders(), &[], &[]);
        let keys: Vec<&str> = stats
            .custom_orders_by_status
            .iter()
            .map(|b| b.key.as_str())
            .collect();
        assert_eq!(
            keys,
            ["Pending", "Approve", "Reject", "Hold", "Processing", "Completed"]
        );
        assert_eq!(stats.custom_orders_by_status[0].count, 2);
        assert_eq!(stats.custom_orders_by_status[3].count, 0);
        assert_eq!(stats.total_custom_orders, 4);
    }

    #[test]
    fn days_are_chronological_and_unpadded() {
        let stats = aggregate(&orders(), &[], &[]);
        assert_eq!(
            stats.custom_orders_by_day,
            vec![Bucket::new("2024-2-28", 1), Bucket::new("2024-3-9", 2)]
        );
    }

    #[test]
    fn countries_skip_missing_values() {
        let employees: Vec<Employee> = decode_all(vec![
            json!({"id": 1, "country": "Peru"}),
            json!({"id": 2, "country": "Chile"}),
            json!({"id": 3, "country": "Peru"}),
            json!({"id": 4}),
            json!({"id": 5, "country": " "}),
        ])
        .unwrap();
        let stats = aggregate(&[], &employees, &[]);
        assert_eq!(
            stats.employees_by_country,
            vec![Bucket::new("Chile", 1), Bucket::new("Peru", 2)]
        );
        assert_eq!(stats.total_employees, 5);
    }
}
