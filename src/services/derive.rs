use serde::Serialize;

/// Markup representing equivalent in-house cost; framed to users as roughly
/// 70% savings over hiring locally.
pub const SAVINGS_MULTIPLIER: f64 = 2.3;

struct RoleTemplate {
    title: &'static str,
    unit_cost: f64,
    share_of_budget: f64,
    pitch: &'static str,
}

struct RoleRule {
    keywords: &'static [&'static str],
    template: RoleTemplate,
}

/// Ordered, non-exclusive keyword rules. Every rule is matched independently
/// against the description, so a lead mentioning both support and sales gets
/// two role entries.
const ROLE_RULES: &[RoleRule] = &[
    RoleRule {
        keywords: &[
            "customer support",
            "customer service",
            "support ticket",
            "tickets",
            "helpdesk",
        ],
        template: RoleTemplate {
            title: "Customer Support Specialists",
            unit_cost: 2000.0,
            share_of_budget: 0.4,
            pitch: "Cover your queues across time zones and cut first-response time",
        },
    },
    RoleRule {
        keywords: &["sales", "lead generation", "outbound", "cold call", "pipeline"],
        template: RoleTemplate {
            title: "Sales Development Representatives",
            unit_cost: 2500.0,
            share_of_budget: 0.35,
            pitch: "Keep your pipeline warm with dedicated outbound capacity",
        },
    },
    RoleRule {
        keywords: &["data entry", "back office", "bookkeeping", "invoices", "admin work"],
        template: RoleTemplate {
            title: "Back Office Associates",
            unit_cost: 1800.0,
            share_of_budget: 0.3,
            pitch: "Offload repetitive processing so your team stays on core work",
        },
    },
    RoleRule {
        keywords: &["marketing", "social media", "content", "seo", "campaigns"],
        template: RoleTemplate {
            title: "Marketing Assistants",
            unit_cost: 2200.0,
            share_of_budget: 0.3,
            pitch: "Sustain always-on content and campaign operations",
        },
    },
    RoleRule {
        keywords: &["developer", "engineering", "software", "qa", "technical backlog"],
        template: RoleTemplate {
            title: "Technical Specialists",
            unit_cost: 3500.0,
            share_of_budget: 0.45,
            pitch: "Extend your engineering bandwidth without a local hiring cycle",
        },
    },
];

const DEFAULT_ROLE: RoleTemplate = RoleTemplate {
    title: "General Virtual Assistants",
    unit_cost: 1500.0,
    share_of_budget: 0.35,
    pitch: "Flexible generalists matched to your day-to-day workload",
};

const TIMELINE: &[&str] = &[
    "Week 1: discovery call and role scoping",
    "Week 2: candidate shortlist and interviews",
    "Week 3: onboarding and tooling access",
    "Week 4: first full sprint with your team",
];

const RISKS: &[&str] = &[
    "Knowledge transfer takes one to two sprints before full velocity",
    "Time-zone overlap needs an agreed daily window",
    "Tooling and data access must be provisioned before day one",
];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProposalRole {
    pub title: String,
    pub count: u32,
    pub monthly_cost: f64,
    pub pitch: String,
}

/// Live preview derived from the builder form. Recomputed from scratch on
/// every call; holds no identity beyond its inputs.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Proposal {
    pub roles: Vec<ProposalRole>,
    pub total_monthly_cost: f64,
    pub estimated_savings: f64,
    pub timeline: Vec<String>,
    pub risks: Vec<String>,
}

/// Free-text budget to a number. Strips currency noise; anything unparsable
/// or negative is 0, never NaN.
pub fn parse_budget(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let value = cleaned.parse::<f64>().unwrap_or(0.0);
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn size_role(template: &RoleTemplate, budget: f64) -> ProposalRole {
    let count = (budget / template.unit_cost).floor().max(1.0) as u32;
    // No single role may be allocated more than the whole stated budget.
    let monthly_cost = (budget * template.share_of_budget).min(budget);
    ProposalRole {
        title: template.title.to_string(),
        count,
        monthly_cost,
        pitch: template.pitch.to_string(),
    }
}

/// Match the description against every rule independently and size one role
/// per matched rule; zero matches fall back to exactly one generalist role.
pub fn build_proposal(description: &str, budget: f64) -> Proposal {
    let haystack = description.to_ascii_lowercase();
    let budget = if budget.is_finite() && budget > 0.0 {
        budget
    } else {
        0.0
    };

    let mut roles = Vec::new();
    for rule in ROLE_RULES {
        if rule.keywords.iter().any(|k| haystack.contains(k)) {
            roles.push(size_role(&rule.template, budget));
        }
    }
    if roles.is_empty() {
        roles.push(size_role(&DEFAULT_ROLE, budget));
    }

    let total_monthly_cost: f64 = roles.iter().map(|r| r.monthly_cost).sum();
    Proposal {
        roles,
        total_monthly_cost,
        estimated_savings: total_monthly_cost * SAVINGS_MULTIPLIER,
        timeline: TIMELINE.iter().map(|s| s.to_string()).collect(),
        risks: RISKS.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_scenario_customer_support() {
        let p = build_proposal("our customer support tickets are overwhelming", 5000.0);
        assert_eq!(p.roles.len(), 1);
        assert_eq!(p.roles[0].title, "Customer Support Specialists");
        assert_eq!(p.roles[0].count, 2);
        assert_eq!(p.roles[0].monthly_cost, 2000.0);
        assert_eq!(p.total_monthly_cost, 2000.0);
        assert_eq!(p.estimated_savings, 4600.0);
    }

    #[test]
    fn two_independent_rules_yield_two_roles() {
        let p = build_proposal("customer support is drowning and sales outreach stalled", 8000.0);
        let titles: Vec<&str> = p.roles.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Customer Support Specialists",
                "Sales Development Representatives"
            ]
        );
    }

    #[test]
    fn unmatched_description_yields_exactly_one_default_role() {
        let p = build_proposal("we just need help", 3000.0);
        assert_eq!(p.roles.len(), 1);
        assert_eq!(p.roles[0].title, "General Virtual Assistants");

        let empty = build_proposal("", 3000.0);
        assert_eq!(empty.roles.len(), 1);
    }

    #[test]
    fn no_role_cost_exceeds_the_budget() {
        for budget in [0.0, 1.0, 250.0, 1999.0, 5000.0, 250_000.0] {
            let p = build_proposal("support tickets sales marketing data entry software", budget);
            for role in &p.roles {
                assert!(
                    role.monthly_cost <= budget,
                    "{} allocated {} of {}",
                    role.title,
                    role.monthly_cost,
                    budget
                );
            }
        }
    }

    #[test]
    fn derivation_is_pure() {
        let a = build_proposal("helpdesk and seo", 4200.0);
        let b = build_proposal("helpdesk and seo", 4200.0);
        assert_eq!(a, b);
    }

    #[test]
    fn budget_parsing_defaults_to_zero() {
        assert_eq!(parse_budget("$5,000"), 5000.0);
        assert_eq!(parse_budget("5000.50"), 5000.5);
        assert_eq!(parse_budget(""), 0.0);
        assert_eq!(parse_budget("call us"), 0.0);
        assert_eq!(parse_budget("-200"), 200.0);
    }

    #[test]
    fn zero_budget_still_sizes_one_seat() {
        let p = build_proposal("helpdesk", 0.0);
        assert_eq!(p.roles[0].count, 1);
        assert_eq!(p.roles[0].monthly_cost, 0.0);
        assert_eq!(p.estimated_savings, 0.0);
    }
}
