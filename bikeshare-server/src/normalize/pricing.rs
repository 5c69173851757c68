//! System pricing plans.

use serde::Serialize;

use super::fields::Fields;

/// Plan-level fields of `system_pricing_plans`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingPlan {
    pub plan_id: String,
    pub name: Option<String>,
    pub currency: Option<String>,
    pub price: Option<f64>,
    pub is_taxable: Option<bool>,
    pub description: Option<String>,
}

/// One `per_min_pricing` segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerMinRate {
    pub start: Option<f64>,
    pub rate: Option<f64>,
    pub interval: Option<f64>,
    pub end: Option<f64>,
}

/// A per-minute segment carrying the plan it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingRow {
    pub plan: PricingPlan,
    pub segment: PerMinRate,
}

/// Normalized `system_pricing_plans`: every plan, plus the exploded
/// per-minute rows. Flat-price plans appear only in `plans`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PricingTable {
    pub plans: Vec<PricingPlan>,
    pub rows: Vec<PricingRow>,
}

impl PricingTable {
    pub(crate) fn push(&mut self, plan: PricingPlan, segments: Vec<PerMinRate>) {
        self.rows.extend(segments.into_iter().map(|segment| PricingRow {
            plan: plan.clone(),
            segment,
        }));
        self.plans.push(plan);
    }
}

pub(crate) fn read_plan(
    fields: Fields<'_>,
    issues: &mut Vec<String>,
) -> Result<(PricingPlan, Vec<PerMinRate>), String> {
    let plan_id = fields
        .string("plan_id")
        .ok_or_else(|| "missing plan_id".to_string())?;

    let entries = fields.nested("per_min_pricing").unwrap_or_else(|reason| {
        issues.push(reason);
        &[][..]
    });

    let mut segments = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let Some(segment) = Fields::new(entry) else {
            issues.push(format!("per_min_pricing[{i}] is not an object"));
            continue;
        };
        segments.push(PerMinRate {
            start: segment.f64("start"),
            rate: segment.f64("rate"),
            interval: segment.f64("interval"),
            end: segment.f64("end"),
        });
    }

    let plan = PricingPlan {
        plan_id,
        name: fields.string("name"),
        currency: fields.string("currency"),
        price: fields.f64("price"),
        is_taxable: fields.flag("is_taxable"),
        description: fields.string("description"),
    };

    Ok((plan, segments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plan_with_segments_explodes() {
        let v = json!({
            "plan_id": "day-pass",
            "name": "Day Pass",
            "currency": "USD",
            "price": 18.1,
            "is_taxable": false,
            "per_min_pricing": [
                {"start": 0, "rate": 0, "interval": 1, "end": 180},
                {"start": 180, "rate": 0.18, "interval": 1}
            ]
        });

        let (plan, segments) = read_plan(Fields::new(&v).unwrap(), &mut Vec::new()).unwrap();
        assert_eq!(plan.plan_id, "day-pass");
        assert_eq!(plan.is_taxable, Some(false));
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].rate, Some(0.18));
        assert_eq!(segments[1].end, None);

        let mut table = PricingTable::default();
        table.push(plan.clone(), segments);
        assert_eq!(table.plans.len(), 1);
        assert_eq!(table.rows.len(), 2);
        assert!(table.rows.iter().all(|r| r.plan == plan));
    }

    #[test]
    fn flat_plan_has_no_rows() {
        let v = json!({"plan_id": "single", "price": "1.00"});
        let (plan, segments) = read_plan(Fields::new(&v).unwrap(), &mut Vec::new()).unwrap();
        assert_eq!(plan.price, Some(1.0));
        assert!(segments.is_empty());
    }

    #[test]
    fn plan_needs_an_id() {
        let v = json!({"name": "Mystery"});
        assert!(read_plan(Fields::new(&v).unwrap(), &mut Vec::new()).is_err());
    }

    #[test]
    fn malformed_segment_is_skipped_and_reported() {
        let v = json!({
            "plan_id": "member",
            "per_min_pricing": [{"start": 0, "rate": 0.1}, "free", {"start": 45, "rate": 0.2}]
        });
        let mut issues = Vec::new();

        let (_, segments) = read_plan(Fields::new(&v).unwrap(), &mut issues).unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].start, Some(45.0));
        assert_eq!(issues, vec!["per_min_pricing[1] is not an object"]);
    }
}
