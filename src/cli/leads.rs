use super::commands::LeadCommands;
use super::http_client::LeadClient;
use crate::query::ListLeadsParams;
use crate::types::Lead;

pub fn run_leads(server: &str, command: LeadCommands) -> anyhow::Result<()> {
    let client = LeadClient::new(server)?;

    match command {
        LeadCommands::List { filters, json } => run_leads_list(&client, &filters.into(), json),
        LeadCommands::Show { id, json } => run_leads_show(&client, &id, json),
        LeadCommands::Stats { json } => run_leads_stats(&client, json),
    }
}

fn run_leads_list(client: &LeadClient, params: &ListLeadsParams, json: bool) -> anyhow::Result<()> {
    let resp = client.list_leads(params)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resp)?);
        return Ok(());
    }

    if resp.leads.is_empty() {
        println!("No leads found.");
        return Ok(());
    }

    println!();
    println!(
        "  {:<36}  {:<24}  {:<32}  {:<10}  {:<9}  {}",
        "ID", "NAME", "EMAIL", "STATUS", "STAGE", "SOURCE"
    );
    for lead in &resp.leads {
        println!(
            "  {:<36}  {:<24}  {:<32}  {:<10}  {:<9}  {}",
            lead.id,
            truncate(&lead.name, 24),
            truncate(&lead.email, 32),
            lead.status,
            lead.stage,
            lead.source
        );
    }
    println!();
    println!(
        "  Page {} of {} ({} leads)",
        resp.page,
        resp.pages.max(1),
        resp.total
    );
    println!();

    Ok(())
}

fn run_leads_show(client: &LeadClient, id: &str, json: bool) -> anyhow::Result<()> {
    let lead = client.get_lead(id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&lead)?);
    } else {
        print_lead(&lead);
    }
    Ok(())
}

fn run_leads_stats(client: &LeadClient, json: bool) -> anyhow::Result<()> {
    let stats = client.lead_stats()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!();
    println!("  Total leads:     {}", stats.total_leads);
    println!("  Converted leads: {}", stats.converted_leads);
    if !stats.lead_by_stage.is_empty() {
        println!();
        println!("  By stage:");
        for (stage, count) in &stats.lead_by_stage {
            println!("    {stage:<12} {count}");
        }
    }
    if !stats.lead_by_status.is_empty() {
        println!();
        println!("  By status:");
        for (status, count) in &stats.lead_by_status {
            println!("    {status:<12} {count}");
        }
    }
    println!();

    Ok(())
}

fn print_lead(lead: &Lead) {
    println!();
    println!("  {}", lead.name);
    println!();
    println!("  ID:       {}", lead.id);
    println!("  Email:    {}", lead.email);
    println!("  Phone:    {}", lead.phone.as_deref().unwrap_or("-"));
    println!("  Status:   {}", lead.status);
    println!("  Stage:    {}", lead.stage);
    println!("  Source:   {}", lead.source);
    println!("  Created:  {}", lead.created_at.to_rfc3339());
    println!("  Updated:  {}", lead.updated_at.to_rfc3339());
    if let Some(notes) = &lead.notes {
        println!();
        println!("  {notes}");
    }
    println!();
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
