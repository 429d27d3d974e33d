use serde::{Deserialize, Serialize};

const WEEKS_PER_YEAR: f64 = 52.0;

// Secondary-value coefficients. Each feeds an independent linear formula over
// the base cost numbers; none of them reads another derived value.
const PRODUCTIVITY_GAIN_RATE: f64 = 0.15;
const SCALABILITY_VALUE_RATE: f64 = 0.05;
const RISK_REDUCTION_RATE: f64 = 0.08;
const ATTRITION_SAVINGS_PER_SEAT: f64 = 1200.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleLine {
    pub title: String,
    pub headcount: u32,
    pub hourly_rate: f64,
    pub hours_per_week: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiInputs {
    pub roles: Vec<RoleLine>,
    /// Benefits load as a fraction of wages (0.2 = 20%).
    pub benefits_pct: f64,
    /// Facilities/equipment overhead as a fraction of wages.
    pub overhead_pct: f64,
    /// Flat monthly management fee per outsourced seat.
    pub management_fee_monthly: f64,
    /// Fixed annual department rate per outsourced seat.
    pub outsourced_seat_annual: f64,
    /// Share of total headcount moved offshore, 0..=100.
    pub outsource_pct: f64,
    /// Year-over-year growth applied to the projection.
    pub growth_pct: f64,
    pub horizon_years: u32,
}

impl Default for RoiInputs {
    fn default() -> Self {
        Self {
            roles: Vec::new(),
            benefits_pct: 0.2,
            overhead_pct: 0.15,
            management_fee_monthly: 250.0,
            outsourced_seat_annual: 18_000.0,
            outsource_pct: 50.0,
            growth_pct: 10.0,
            horizon_years: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct YearProjection {
    pub year: u32,
    pub annual_value: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RoiReport {
    pub total_headcount: u32,
    pub outsourced_headcount: u32,
    pub retained_headcount: u32,
    pub in_house_annual_cost: f64,
    pub fully_outsourced_annual_cost: f64,
    pub blended_annual_cost: f64,
    pub annual_savings: f64,
    pub productivity_gain: f64,
    pub scalability_value: f64,
    pub risk_reduction: f64,
    pub attrition_savings: f64,
    pub total_annual_value: f64,
    pub projections: Vec<YearProjection>,
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Compute the full ROI report. Pure and total: any malformed numeric input
/// is treated as 0, percentages are clamped, and nothing rounds before
/// display.
pub fn calculate(inputs: &RoiInputs) -> RoiReport {
    let benefits = sanitize(inputs.benefits_pct).max(0.0);
    let overhead = sanitize(inputs.overhead_pct).max(0.0);
    let fee = sanitize(inputs.management_fee_monthly).max(0.0);
    let seat_rate = sanitize(inputs.outsourced_seat_annual).max(0.0);
    let outsource_pct = sanitize(inputs.outsource_pct).clamp(0.0, 100.0);
    let growth = sanitize(inputs.growth_pct).max(0.0);

    let mut total_headcount: u32 = 0;
    let mut in_house_annual_cost = 0.0;
    let mut fully_outsourced_annual_cost = 0.0;
    for role in &inputs.roles {
        let seats = f64::from(role.headcount);
        let rate = sanitize(role.hourly_rate).max(0.0);
        let hours = sanitize(role.hours_per_week).max(0.0);
        total_headcount += role.headcount;
        in_house_annual_cost += rate * hours * WEEKS_PER_YEAR * (1.0 + benefits + overhead) * seats;
        fully_outsourced_annual_cost += (seat_rate + fee * 12.0) * seats;
    }

    // The split is costed at fleet-wide averages, not per role: once seats
    // move offshore they no longer map back to their original role's cost.
    let outsourced_headcount =
        ((f64::from(total_headcount) * outsource_pct / 100.0).round() as u32).min(total_headcount);
    let retained_headcount = total_headcount - outsourced_headcount;

    let (avg_in_house_seat, avg_outsourced_seat) = if total_headcount == 0 {
        (0.0, 0.0)
    } else {
        let seats = f64::from(total_headcount);
        (
            in_house_annual_cost / seats,
            fully_outsourced_annual_cost / seats,
        )
    };

    let blended_annual_cost = f64::from(retained_headcount) * avg_in_house_seat
        + f64::from(outsourced_headcount) * avg_outsourced_seat;
    let annual_savings = in_house_annual_cost - blended_annual_cost;

    let outsourced_seats = f64::from(outsourced_headcount);
    let productivity_gain = outsourced_seats * avg_in_house_seat * PRODUCTIVITY_GAIN_RATE;
    let scalability_value = in_house_annual_cost * SCALABILITY_VALUE_RATE;
    let risk_reduction = outsourced_seats * avg_outsourced_seat * RISK_REDUCTION_RATE;
    let attrition_savings = outsourced_seats * ATTRITION_SAVINGS_PER_SEAT;

    let total_annual_value = annual_savings
        + productivity_gain
        + scalability_value
        + risk_reduction
        + attrition_savings;

    let horizon = inputs.horizon_years.max(1);
    let mut projections = Vec::with_capacity(horizon as usize);
    for year in 1..=horizon {
        let factor = (1.0 + growth / 100.0).powi(year as i32 - 1);
        projections.push(YearProjection {
            year,
            annual_value: total_annual_value * factor,
        });
    }

    RoiReport {
        total_headcount,
        outsourced_headcount,
        retained_headcount,
        in_house_annual_cost,
        fully_outsourced_annual_cost,
        blended_annual_cost,
        annual_savings,
        productivity_gain,
        scalability_value,
        risk_reduction,
        attrition_savings,
        total_annual_value,
        projections,
    }
}
