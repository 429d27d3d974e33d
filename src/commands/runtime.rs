use anyhow::Context;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::cli::{
    AuthCommands, BuilderCommands, CertCommands, Cli, Commands, DocCommands, IntakeCommands,
    JobsCommands, OnboardingCommands, ProfileCommands, RoiCommands,
};
use crate::commands::api_client;
use crate::domain::models::{
    AuthRedirect, CertificationPayload, CursorReport, DocumentPayload, OnboardingReport, State,
    StepReport, SubmissionReport,
};
use crate::flows::{lead_intake, talent_profile};
use crate::services::api::Session;
use crate::services::derive::{build_proposal, parse_budget};
use crate::services::gateway;
use crate::services::output::{print_one, print_out};
use crate::services::roi;
use crate::services::storage::{
    audit, clear_onboarding_flags, discard_draft, load_draft, onboarding_flag, save_draft,
    save_state, set_onboarding_flag, ConfigFile, Draft,
};
use crate::wizard::{
    first_invalid_step, validate_step, FieldSchema, FormState, StepCheck, StepCursor,
    StepDefinition, WizardError,
};

pub fn handle_runtime_commands(
    cli: &Cli,
    config: &ConfigFile,
    session: &Session,
    state: &mut State,
) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Intake { command } => handle_intake(cli, config, session, command),
        Commands::Profile { command } => handle_profile(cli, config, session, command),
        Commands::Builder { command } => match command {
            BuilderCommands::Propose {
                description,
                budget,
            } => {
                let proposal = build_proposal(description, parse_budget(budget));
                print_one(cli.json, proposal, |p| {
                    let mut lines: Vec<String> = p
                        .roles
                        .iter()
                        .map(|r| {
                            format!("{} x{} (${:.0}/mo)", r.title, r.count, r.monthly_cost)
                        })
                        .collect();
                    lines.push(format!(
                        "total ${:.0}/mo, est. in-house equivalent ${:.0}/mo",
                        p.total_monthly_cost, p.estimated_savings
                    ));
                    lines.join("\n")
                })
            }
        },
        Commands::Roi { command } => match command {
            RoiCommands::Calc { file } => {
                let inputs: roi::RoiInputs = read_json_file(file)?;
                let report = roi::calculate(&inputs);
                print_one(cli.json, report, |r| {
                    format!(
                        "savings ${:.0}/yr, total value ${:.0}/yr ({} of {} seats outsourced)",
                        r.annual_savings,
                        r.total_annual_value,
                        r.outsourced_headcount,
                        r.total_headcount
                    )
                })
            }
        },
        Commands::Jobs { command } => {
            let api = api_client(cli, config, session)?;
            match command {
                JobsCommands::Search {
                    query,
                    category,
                    remote,
                } => {
                    let mut pairs: Vec<(&str, String)> = Vec::new();
                    if let Some(q) = query {
                        pairs.push(("query", q.clone()));
                    }
                    if let Some(c) = category {
                        pairs.push(("category", c.clone()));
                    }
                    if *remote {
                        pairs.push(("remote", "true".to_string()));
                    }
                    let resource = resource_key("jobs-search", &pairs);
                    let value = api.get_cached(&resource, "/api/jobs/search", &pairs)?;
                    let items = value.as_array().cloned().unwrap_or_default();
                    print_out(cli.json, &items, |j| {
                        format!(
                            "{}\t{}\t{}",
                            j.get("id").and_then(|v| v.as_str()).unwrap_or("-"),
                            j.get("title").and_then(|v| v.as_str()).unwrap_or("-"),
                            j.get("company").and_then(|v| v.as_str()).unwrap_or("-")
                        )
                    })
                }
                JobsCommands::Matches { category } => {
                    let mut pairs: Vec<(&str, String)> = Vec::new();
                    if let Some(c) = category {
                        pairs.push(("category", c.clone()));
                    }
                    let resource =
                        resource_key(&format!("matches/{}", session.user), &pairs);
                    let value = api.get_cached(&resource, "/api/matches", &pairs)?;
                    let items = value.as_array().cloned().unwrap_or_default();
                    print_out(cli.json, &items, |j| {
                        format!(
                            "{}\t{}",
                            j.get("title").and_then(|v| v.as_str()).unwrap_or("-"),
                            j.get("score").map(|v| v.to_string()).unwrap_or_default()
                        )
                    })
                }
            }
        }
        Commands::Cert { command } => handle_cert(cli, config, session, command),
        Commands::Doc { command } => {
            let api = api_client(cli, config, session)?;
            match command {
                DocCommands::Register { name, url, kind } => {
                    let payload = DocumentPayload {
                        name: name.clone(),
                        url: url.clone(),
                        kind: kind.clone(),
                    };
                    let value = api.post_json("/api/documents", &payload)?;
                    api.invalidate(&format!("documents/{}", session.user));
                    audit("doc_register", serde_json::json!({ "name": name }));
                    print_one(cli.json, value, |_| format!("registered {}", name))
                }
                DocCommands::Remove { id } => {
                    api.delete(&format!("/api/documents/{}", id))?;
                    api.invalidate(&format!("documents/{}", session.user));
                    audit("doc_remove", serde_json::json!({ "id": id }));
                    print_one(cli.json, id.clone(), |i| format!("removed document {}", i))
                }
            }
        }
        Commands::Onboarding { command } => handle_onboarding(cli, session, state, command),
        Commands::Auth { command } => match command {
            AuthCommands::Login { provider } => {
                let api = api_client(cli, config, session)?;
                let value = api.post_json(
                    &format!("/api/auth/{}", provider.as_str()),
                    &serde_json::json!({ "user": session.user }),
                )?;
                let redirect = AuthRedirect {
                    provider: provider.as_str().to_string(),
                    redirect_url: value
                        .get("redirect_url")
                        .and_then(|v| v.as_str())
                        .unwrap_or("n/a")
                        .to_string(),
                };
                print_one(cli.json, redirect, |r| {
                    format!("open {} to continue with {}", r.redirect_url, r.provider)
                })
            }
        },
        Commands::Train { .. } => unreachable!("handled before runtime dispatch"),
    }
}

fn handle_intake(
    cli: &Cli,
    config: &ConfigFile,
    session: &Session,
    command: &IntakeCommands,
) -> anyhow::Result<()> {
    match command {
        IntakeCommands::Validate { file, step } => {
            let form: lead_intake::LeadIntakeForm = read_json_file(file)?;
            let reports = step_reports(
                lead_intake::FLOW_NAME,
                lead_intake::STEPS,
                lead_intake::SCHEMA,
                &form,
                *step,
            )?;
            print_out(cli.json, &reports, |r| {
                format!("step {} {}: {}", r.step, r.title, r.check.summary())
            })
        }
        IntakeCommands::Preview { file } => {
            let form: lead_intake::LeadIntakeForm = load_or_draft(file, lead_intake::FLOW_NAME)?;
            let proposal = form.proposal();
            print_one(cli.json, proposal, |p| {
                format!(
                    "{} role(s), total ${:.0}/mo, est. savings ${:.0}/mo",
                    p.roles.len(),
                    p.total_monthly_cost,
                    p.estimated_savings
                )
            })
        }
        IntakeCommands::Save { file } => {
            let form: lead_intake::LeadIntakeForm = read_json_file(file)?;
            // A freshly saved draft starts at the first step.
            let path = save_draft(lead_intake::FLOW_NAME, &Draft { form, step: 0 })?;
            print_one(cli.json, path.display().to_string(), |p| {
                format!("draft saved to {}", p)
            })
        }
        IntakeCommands::Resume => {
            let draft: Option<Draft<lead_intake::LeadIntakeForm>> =
                load_draft(lead_intake::FLOW_NAME)?;
            match draft {
                Some(draft) => print_one(cli.json, draft, |d| {
                    format!(
                        "draft for {} <{}> (step {})",
                        d.form.contact_name,
                        d.form.email,
                        d.step + 1
                    )
                }),
                None => print_one(cli.json, serde_json::Value::Null, |_| {
                    "no saved draft".to_string()
                }),
            }
        }
        IntakeCommands::Next => {
            let draft: Draft<lead_intake::LeadIntakeForm> = load_draft(lead_intake::FLOW_NAME)?
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "no saved draft for {}; run intake save first",
                        lead_intake::FLOW_NAME
                    )
                })?;
            let cursor = StepCursor::resume(draft.step, lead_intake::STEPS.len());
            let check = validate_step(
                &lead_intake::STEPS[cursor.index()],
                &draft.form,
                lead_intake::SCHEMA,
            );
            let moved = cursor.advance(&check);
            save_draft(
                lead_intake::FLOW_NAME,
                &Draft {
                    form: draft.form,
                    step: moved.index(),
                },
            )?;
            let report = CursorReport {
                flow: lead_intake::FLOW_NAME.to_string(),
                step: moved.index() + 1,
                title: lead_intake::STEPS[moved.index()].title.to_string(),
                at_end: moved.at_end(),
                check,
            };
            print_one(cli.json, report, |r| match &r.check {
                StepCheck::Ok => format!(
                    "now at step {} {}{}",
                    r.step,
                    r.title,
                    if r.at_end { " (last)" } else { "" }
                ),
                fail => format!("still at step {} {}: {}", r.step, r.title, fail.summary()),
            })
        }
        IntakeCommands::Back => {
            let draft: Draft<lead_intake::LeadIntakeForm> = load_draft(lead_intake::FLOW_NAME)?
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "no saved draft for {}; run intake save first",
                        lead_intake::FLOW_NAME
                    )
                })?;
            let moved = StepCursor::resume(draft.step, lead_intake::STEPS.len()).retreat();
            save_draft(
                lead_intake::FLOW_NAME,
                &Draft {
                    form: draft.form,
                    step: moved.index(),
                },
            )?;
            let report = CursorReport {
                flow: lead_intake::FLOW_NAME.to_string(),
                step: moved.index() + 1,
                title: lead_intake::STEPS[moved.index()].title.to_string(),
                at_end: moved.at_end(),
                check: StepCheck::Ok,
            };
            print_one(cli.json, report, |r| {
                format!("now at step {} {}", r.step, r.title)
            })
        }
        IntakeCommands::Discard => {
            let removed = discard_draft(lead_intake::FLOW_NAME)?;
            print_one(cli.json, removed, |r| {
                if *r {
                    "draft discarded".to_string()
                } else {
                    "no draft to discard".to_string()
                }
            })
        }
        IntakeCommands::Submit { file } => {
            let form: lead_intake::LeadIntakeForm = load_or_draft(file, lead_intake::FLOW_NAME)?;
            // The whole wizard must validate before anything touches the
            // network; a rejected step keeps the draft for retry.
            if let Some((step_id, check)) =
                first_invalid_step(lead_intake::STEPS, &form, lead_intake::SCHEMA)
            {
                return Err(WizardError::StepRejected {
                    step: step_id + 1,
                    summary: check.summary(),
                }
                .into());
            }
            let api = api_client(cli, config, session)?;
            let receipt = gateway::submit(&api, lead_intake::SUBMIT_PATH, &form.to_wire())?;
            let _ = discard_draft(lead_intake::FLOW_NAME);
            let report = SubmissionReport {
                id: receipt.id,
                next: "Thanks! We'll reach out to schedule a discovery call.".to_string(),
            };
            print_one(cli.json, report, |r| {
                format!("submitted (id {}) — {}", r.id, r.next)
            })
        }
    }
}

fn handle_profile(
    cli: &Cli,
    config: &ConfigFile,
    session: &Session,
    command: &ProfileCommands,
) -> anyhow::Result<()> {
    match command {
        ProfileCommands::Validate { file, step } => {
            let form: talent_profile::TalentProfileForm = read_json_file(file)?;
            let reports = step_reports(
                talent_profile::FLOW_NAME,
                talent_profile::STEPS,
                talent_profile::SCHEMA,
                &form,
                *step,
            )?;
            print_out(cli.json, &reports, |r| {
                format!("step {} {}: {}", r.step, r.title, r.check.summary())
            })
        }
        ProfileCommands::Progress { file } => {
            let form: talent_profile::TalentProfileForm = read_json_file(file)?;
            let percent = form.progress_percent();
            print_one(cli.json, percent, |p| format!("{:.0}% complete", p))
        }
        ProfileCommands::Submit { file } => {
            let form: talent_profile::TalentProfileForm =
                load_or_draft(file, talent_profile::FLOW_NAME)?;
            if let Some((step_id, check)) =
                first_invalid_step(talent_profile::STEPS, &form, talent_profile::SCHEMA)
            {
                return Err(WizardError::StepRejected {
                    step: step_id + 1,
                    summary: check.summary(),
                }
                .into());
            }
            let api = api_client(cli, config, session)?;
            let receipt = gateway::submit(&api, talent_profile::SUBMIT_PATH, &form.to_wire())?;
            let _ = discard_draft(talent_profile::FLOW_NAME);
            let report = SubmissionReport {
                id: receipt.id,
                next: "Profile saved. Recruiters can now find you in search.".to_string(),
            };
            print_one(cli.json, report, |r| {
                format!("submitted (id {}) — {}", r.id, r.next)
            })
        }
        ProfileCommands::Save { file } => {
            let form: talent_profile::TalentProfileForm = read_json_file(file)?;
            let path = save_draft(talent_profile::FLOW_NAME, &Draft { form, step: 0 })?;
            print_one(cli.json, path.display().to_string(), |p| {
                format!("draft saved to {}", p)
            })
        }
        ProfileCommands::Resume => {
            let draft: Option<Draft<talent_profile::TalentProfileForm>> =
                load_draft(talent_profile::FLOW_NAME)?;
            match draft {
                Some(draft) => print_one(cli.json, draft, |d| {
                    format!("draft for {} (step {})", d.form.display_name, d.step + 1)
                }),
                None => print_one(cli.json, serde_json::Value::Null, |_| {
                    "no saved draft".to_string()
                }),
            }
        }
    }
}

fn handle_cert(
    cli: &Cli,
    config: &ConfigFile,
    session: &Session,
    command: &CertCommands,
) -> anyhow::Result<()> {
    let api = api_client(cli, config, session)?;
    match command {
        CertCommands::List { talent } => {
            let talent = talent.clone().unwrap_or_else(|| session.user.clone());
            let resource = format!("certifications/{}", talent);
            let value = api.get_cached(
                &resource,
                &format!("/api/talents/{}/certifications", talent),
                &[],
            )?;
            let items = value.as_array().cloned().unwrap_or_default();
            print_out(cli.json, &items, |c| {
                format!(
                    "{}\t{}\t{}",
                    c.get("id").map(|v| v.to_string()).unwrap_or_default(),
                    c.get("name").and_then(|v| v.as_str()).unwrap_or("-"),
                    c.get("issuer").and_then(|v| v.as_str()).unwrap_or("-")
                )
            })
        }
        CertCommands::Add { name, issuer, year } => {
            let payload = CertificationPayload {
                name: name.clone(),
                issuer: issuer.clone(),
                year: *year,
            };
            let value = api.post_json("/api/certifications", &payload)?;
            api.invalidate(&format!("certifications/{}", session.user));
            audit("cert_add", serde_json::json!({ "name": name }));
            print_one(cli.json, value, |_| format!("added {}", name))
        }
        CertCommands::Update {
            id,
            name,
            issuer,
            year,
        } => {
            let payload = serde_json::json!({
                "name": name,
                "issuer": issuer,
                "year": year,
            });
            let value = api.put_json(&format!("/api/certifications/{}", id), &payload)?;
            api.invalidate(&format!("certifications/{}", session.user));
            audit("cert_update", serde_json::json!({ "id": id }));
            print_one(cli.json, value, |_| format!("updated {}", id))
        }
        CertCommands::Remove { id } => {
            api.delete(&format!("/api/certifications/{}", id))?;
            api.invalidate(&format!("certifications/{}", session.user));
            audit("cert_remove", serde_json::json!({ "id": id }));
            print_one(cli.json, id.clone(), |i| format!("removed {}", i))
        }
    }
}

fn handle_onboarding(
    cli: &Cli,
    session: &Session,
    state: &mut State,
    command: &OnboardingCommands,
) -> anyhow::Result<()> {
    let user = session.user.clone();
    match command {
        OnboardingCommands::Status => {
            let status = if onboarding_flag(state, "completed", &user) {
                "completed"
            } else if onboarding_flag(state, "skipped", &user) {
                "skipped"
            } else {
                "pending"
            };
            let report = OnboardingReport {
                user,
                status: status.to_string(),
            };
            print_one(cli.json, report, |r| format!("{}\t{}", r.user, r.status))
        }
        OnboardingCommands::Skip => {
            set_onboarding_flag(state, "skipped", &user);
            save_state(state)?;
            print_one(cli.json, "skipped", |_| format!("onboarding skipped for {}", user))
        }
        OnboardingCommands::Complete => {
            set_onboarding_flag(state, "completed", &user);
            save_state(state)?;
            print_one(cli.json, "completed", |_| {
                format!("onboarding completed for {}", user)
            })
        }
        OnboardingCommands::Reset => {
            clear_onboarding_flags(state, &user);
            save_state(state)?;
            print_one(cli.json, "reset", |_| format!("onboarding reset for {}", user))
        }
    }
}

fn read_json_file<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read form file {}", path.display()))?;
    Ok(serde_json::from_str(&raw)?)
}

fn load_or_draft<T: DeserializeOwned>(
    file: &Option<PathBuf>,
    flow: &str,
) -> anyhow::Result<T> {
    match file {
        Some(path) => read_json_file(path),
        None => load_draft::<Draft<T>>(flow)?
            .map(|d| d.form)
            .ok_or_else(|| anyhow::anyhow!("no saved draft for {}; pass --file", flow)),
    }
}

/// Reports for one 1-based step, or for every step in order.
fn step_reports(
    flow: &str,
    steps: &[StepDefinition],
    schema: &[FieldSchema],
    form: &dyn FormState,
    step: Option<usize>,
) -> anyhow::Result<Vec<StepReport>> {
    let selected: Vec<&StepDefinition> = match step {
        Some(n) => {
            let idx = n
                .checked_sub(1)
                .filter(|i| *i < steps.len())
                .ok_or(WizardError::StepOutOfRange(n, steps.len()))?;
            vec![&steps[idx]]
        }
        None => steps.iter().collect(),
    };
    Ok(selected
        .into_iter()
        .map(|s| StepReport {
            flow: flow.to_string(),
            step: s.id + 1,
            title: s.title.to_string(),
            check: validate_step(s, form, schema),
        })
        .collect())
}

/// Deterministic cache identity for a query-parameterized list resource. The
/// key is hashed before it touches the filesystem and is never sent on the
/// wire, so it needs no encoding.
fn resource_key(prefix: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return prefix.to_string();
    }
    let parts: Vec<String> = pairs.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    format!("{}?{}", prefix, parts.join("&"))
}
