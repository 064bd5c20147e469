//! CLI command implementations

use anyhow::{Result, bail};
use colored::Colorize;
use griv_core::{
    Category, Grievance, GrievancePatch, GrievanceStore, Location, NewGrievance, Priority, Status,
    add_remark, apply_status_change, compute_stats, tracking,
};
use tabled::{Table, Tabled, settings::Style};

pub fn init(series_base: Option<u64>) -> Result<()> {
    let store = GrievanceStore::init(series_base)?;
    println!(
        "{} Initialized griv in {}",
        "✓".green(),
        store.griv_dir()?.display()
    );
    println!(
        "  First tracking code: {}",
        tracking::format_tracking_id(store.config().series_base + 1)
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn submit(
    description: &str,
    category: &str,
    ward: &str,
    citizen: &str,
    name: &str,
    priority: Option<String>,
    location: Option<(f64, f64)>,
    image: Option<String>,
    json: bool,
) -> Result<()> {
    let mut store = GrievanceStore::open()?;

    let priority = match priority {
        Some(p) => Some(p.parse::<Priority>()?),
        None => None,
    };

    let grievance = store.create(NewGrievance {
        citizen_id: citizen.to_string(),
        citizen_name: name.to_string(),
        category: category.parse::<Category>()?,
        ward: ward.to_string(),
        description: description.to_string(),
        priority,
        location: location.map(|(latitude, longitude)| Location { latitude, longitude }),
        image_ref: image,
    })?;

    if json {
        println!("{}", serde_json::to_string(&grievance)?);
    } else {
        println!("{} Complaint registered", "✓".green());
        println!("  Tracking code: {}", grievance.tracking_id.cyan().bold());
        println!("  Category:      {}", grievance.category.label());
        println!("  Ward:          {}", grievance.ward);
        println!("  Priority:      {}", grievance.priority);
        println!();
        println!("Keep the tracking code to follow progress: griv track {}", grievance.tracking_id);
    }

    Ok(())
}

#[derive(Tabled)]
struct GrievanceRow {
    #[tabled(rename = "Tracking")]
    tracking: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Ward")]
    ward: String,
    #[tabled(rename = "Citizen")]
    citizen: String,
    #[tabled(rename = "Updated")]
    updated: String,
    #[tabled(rename = "Description")]
    description: String,
}

pub fn list(
    status: Option<String>,
    ward: Option<String>,
    category: Option<String>,
    citizen: Option<String>,
    search: Option<String>,
    json: bool,
) -> Result<()> {
    let store = GrievanceStore::open()?;
    let display = store.config().display.clone();

    let mut grievances: Vec<&Grievance> = match citizen {
        Some(ref id) => store.get_by_citizen(id),
        None => store.all(),
    };

    if let Some(ref s) = status {
        let status: Status = s.parse()?;
        grievances.retain(|g| g.status == status);
    }
    if let Some(ref w) = ward {
        grievances.retain(|g| g.ward.eq_ignore_ascii_case(w));
    }
    if let Some(ref c) = category {
        let category: Category = c.parse()?;
        grievances.retain(|g| g.category == category);
    }
    if let Some(ref term) = search {
        let term = term.to_lowercase();
        grievances.retain(|g| {
            g.tracking_id.to_lowercase().contains(&term)
                || g.citizen_name.to_lowercase().contains(&term)
                || g.description.to_lowercase().contains(&term)
        });
    }

    if json {
        println!("{}", serde_json::to_string(&grievances)?);
        return Ok(());
    }

    if grievances.is_empty() {
        println!("No grievances found");
        return Ok(());
    }

    if display.show_count {
        println!("{}", format!("{} grievances", grievances.len()).bold());
    }

    let rows: Vec<GrievanceRow> = grievances
        .iter()
        .map(|g| GrievanceRow {
            tracking: g.tracking_id.clone(),
            status: g.status.to_string(),
            priority: g.priority.to_string(),
            category: g.category.to_string(),
            ward: g.ward.clone(),
            citizen: g.citizen_name.clone(),
            updated: g.updated_at.format(&display.date_format).to_string(),
            description: truncate(&g.description, display.max_description_length),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));

    Ok(())
}

pub fn show(id: &str, json: bool) -> Result<()> {
    let store = GrievanceStore::open()?;
    let grievance = resolve(&store, id)?;
    let date_format = store.config().display.date_format.clone();

    if json {
        println!("{}", serde_json::to_string_pretty(grievance)?);
        return Ok(());
    }

    println!(
        "{} {}",
        grievance.tracking_id.cyan().bold(),
        grievance.category.label().bold()
    );
    println!();
    println!("Status:    {}", status_colored(grievance.status));
    println!("Priority:  {}", grievance.priority);
    println!("Ward:      {}", grievance.ward);
    println!("Citizen:   {} ({})", grievance.citizen_name, grievance.citizen_id);
    println!("Created:   {}", grievance.created_at.format(&date_format));
    println!("Updated:   {}", grievance.updated_at.format(&date_format));
    if let Some(ref handler) = grievance.assigned_to {
        println!("Assigned:  {}", handler);
    }
    if let Some(location) = grievance.location {
        println!("Location:  {:.6}, {:.6}", location.latitude, location.longitude);
    }
    if let Some(ref image) = grievance.image_ref {
        println!("Image:     {}", image);
    }

    println!();
    println!("{}", "Description:".bold());
    println!("{}", grievance.description);

    if !grievance.admin_remarks.is_empty() {
        println!();
        println!("{}", "Admin remarks:".bold());
        for remark in &grievance.admin_remarks {
            println!("  - {}", remark);
        }
    }

    println!();
    print_timeline(grievance, &date_format);

    Ok(())
}

pub fn track(tracking_id: &str, json: bool) -> Result<()> {
    let store = GrievanceStore::open()?;
    let grievance = store
        .get_by_tracking(tracking_id)
        .ok_or_else(|| anyhow::anyhow!("No grievance with tracking code: {}", tracking_id))?;
    let date_format = store.config().display.date_format.clone();

    if json {
        println!("{}", serde_json::to_string_pretty(grievance)?);
        return Ok(());
    }

    println!("{}", grievance.tracking_id.cyan().bold());
    println!("Status:   {}", status_colored(grievance.status));
    println!("Category: {}", grievance.category.label());
    println!("Ward:     {}", grievance.ward);
    println!("Filed:    {}", grievance.created_at.format(&date_format));
    println!();
    print_timeline(grievance, &date_format);

    Ok(())
}

pub fn status(id: &str, new_status: &str, message: Option<String>, actor: &str, json: bool) -> Result<()> {
    let mut store = GrievanceStore::open()?;
    let grievance = resolve(&store, id)?.clone();

    let new_status: Status = new_status.parse()?;
    let previous = grievance.status;
    let updated = apply_status_change(&grievance, new_status, message.as_deref(), actor);
    store.commit(updated.clone())?;

    if json {
        println!("{}", serde_json::to_string(&updated)?);
    } else if previous == new_status {
        println!(
            "{} {} already {}",
            "✓".green(),
            updated.tracking_id,
            status_colored(new_status)
        );
    } else {
        println!(
            "{} {} {} -> {}",
            "✓".green(),
            updated.tracking_id,
            previous,
            status_colored(new_status)
        );
    }

    Ok(())
}

pub fn remark(id: &str, text: &str, json: bool) -> Result<()> {
    let mut store = GrievanceStore::open()?;
    let grievance = resolve(&store, id)?.clone();

    let updated = add_remark(&grievance, text);
    store.commit(updated.clone())?;

    if json {
        println!("{}", serde_json::to_string(&updated)?);
    } else {
        println!(
            "{} Remark added to {} ({} total)",
            "✓".green(),
            updated.tracking_id,
            updated.admin_remarks.len()
        );
    }

    Ok(())
}

pub fn assign(id: &str, handler: &str, json: bool) -> Result<()> {
    let mut store = GrievanceStore::open()?;
    let record_id = resolve(&store, id)?.id.clone();

    let assigned_to = if handler == "-" {
        None
    } else {
        Some(handler.to_string())
    };
    let patch = GrievancePatch {
        assigned_to: Some(assigned_to.clone()),
        ..Default::default()
    };
    let updated = store.update(&record_id, patch)?;

    if json {
        println!("{}", serde_json::to_string(&updated)?);
    } else if let Some(handler) = assigned_to {
        println!("{} {} assigned to {}", "✓".green(), updated.tracking_id, handler);
    } else {
        println!("{} {} unassigned", "✓".green(), updated.tracking_id);
    }

    Ok(())
}

#[derive(Tabled)]
struct WardRow {
    #[tabled(rename = "Ward")]
    ward: String,
    #[tabled(rename = "Count")]
    count: usize,
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Count")]
    count: usize,
}

pub fn stats(json: bool) -> Result<()> {
    let store = GrievanceStore::open()?;
    let stats = compute_stats(&store.all());

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Grievance dashboard".bold());
    println!();
    println!("Total:        {}", stats.total);
    println!("Pending:      {}", stats.pending.to_string().white());
    println!("In progress:  {}", stats.in_progress.to_string().yellow());
    println!("Resolved:     {}", stats.resolved.to_string().green());
    println!("Escalated:    {}", stats.escalated.to_string().red());
    println!();
    println!("Avg resolution: {:.1} days", stats.avg_resolution_days);

    if !stats.by_ward.is_empty() {
        println!();
        let rows: Vec<WardRow> = stats
            .by_ward
            .iter()
            .map(|(ward, count)| WardRow {
                ward: ward.clone(),
                count: *count,
            })
            .collect();
        println!("{}", Table::new(rows).with(Style::rounded()));
    }

    if !stats.by_category.is_empty() {
        println!();
        let rows: Vec<CategoryRow> = stats
            .by_category
            .iter()
            .map(|(category, count)| CategoryRow {
                category: category.clone(),
                count: *count,
            })
            .collect();
        println!("{}", Table::new(rows).with(Style::rounded()));
    }

    Ok(())
}

pub fn wards(json: bool) -> Result<()> {
    let store = GrievanceStore::open()?;
    let wards = &store.config().wards;

    if json {
        println!("{}", serde_json::to_string(wards)?);
    } else {
        for ward in wards {
            println!("{}", ward);
        }
    }

    Ok(())
}

pub fn categories(json: bool) -> Result<()> {
    if json {
        let entries: Vec<serde_json::Value> = Category::ALL
            .iter()
            .map(|c| serde_json::json!({ "value": c.to_string(), "label": c.label() }))
            .collect();
        println!("{}", serde_json::to_string(&entries)?);
    } else {
        for category in Category::ALL {
            println!("{:<18} {}", category.to_string(), category.label());
        }
    }

    Ok(())
}

/// Show current configuration
pub fn config_show(json: bool) -> Result<()> {
    let store = GrievanceStore::open()?;
    let config = store.config();

    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        println!("{}", "Current configuration:".bold());
        println!();
        println!("series_base = {}", config.series_base);
        println!("default_priority = \"{}\"", config.default_priority);
        println!("wards = {:?}", config.wards);
        println!();
        println!("[display]");
        println!("colors = {}", config.display.colors);
        println!("date_format = \"{}\"", config.display.date_format);
        println!("show_count = {}", config.display.show_count);
        println!("max_description_length = {}", config.display.max_description_length);
    }

    Ok(())
}

/// Edit configuration file
pub fn config_edit() -> Result<()> {
    let store = GrievanceStore::open()?;
    let config_path = store.config_path()?;

    // Get editor from environment
    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| "vi".to_string());

    let status = std::process::Command::new(&editor)
        .arg(&config_path)
        .status()?;

    if !status.success() {
        bail!("Editor exited with non-zero status");
    }

    // Validate the config after editing
    match griv_core::Config::load(&config_path) {
        Ok(_) => println!("{} Configuration saved", "✓".green()),
        Err(e) => {
            println!(
                "{} Warning: Configuration may be invalid: {}",
                "!".yellow(),
                e
            );
        }
    }

    Ok(())
}

/// Reset configuration to defaults
pub fn config_reset() -> Result<()> {
    let store = GrievanceStore::open()?;
    let config_path = store.config_path()?;

    std::fs::write(&config_path, griv_core::Config::default_with_comments())?;

    println!("{} Configuration reset to defaults", "✓".green());
    Ok(())
}

/// Get a specific config value
pub fn config_get(key: &str, json: bool) -> Result<()> {
    let store = GrievanceStore::open()?;
    let config_json = serde_json::to_value(store.config())?;

    // Parse key path (e.g., "display.colors" -> ["display", "colors"])
    let parts: Vec<&str> = key.split('.').collect();
    let mut value = &config_json;

    for part in &parts {
        value = value
            .get(part)
            .ok_or_else(|| anyhow::anyhow!("Config key not found: {}", key))?;
    }

    if json {
        println!("{}", serde_json::to_string(value)?);
    } else {
        match value {
            serde_json::Value::String(s) => println!("{}", s),
            serde_json::Value::Bool(b) => println!("{}", b),
            serde_json::Value::Number(n) => println!("{}", n),
            serde_json::Value::Null => println!("null"),
            _ => println!("{}", serde_json::to_string_pretty(value)?),
        }
    }

    Ok(())
}

/// Set a config value
pub fn config_set(key: &str, value: &str) -> Result<()> {
    let store = GrievanceStore::open()?;
    let config_path = store.config_path()?;
    let mut config = griv_core::Config::load(&config_path)?;

    match key {
        "series_base" => {
            config.series_base = value
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid integer value: {}", value))?;
        }
        "default_priority" => {
            value.parse::<Priority>()?;
            config.default_priority = value.to_string();
        }
        "wards" => {
            config.wards = value
                .split(',')
                .map(|w| w.trim().to_string())
                .filter(|w| !w.is_empty())
                .collect();
        }
        "display.colors" => {
            config.display.colors = value
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid boolean value: {}", value))?;
        }
        "display.date_format" => config.display.date_format = value.to_string(),
        "display.show_count" => {
            config.display.show_count = value
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid boolean value: {}", value))?;
        }
        "display.max_description_length" => {
            config.display.max_description_length = value
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid integer value: {}", value))?;
        }
        _ => bail!("Unknown config key: {}", key),
    }

    config.save(&config_path)?;
    println!("{} Set {} = {}", "✓".green(), key, value);

    Ok(())
}

/// Look a grievance up by record id or tracking code
fn resolve<'a>(store: &'a GrievanceStore, key: &str) -> Result<&'a Grievance> {
    let found = if tracking::is_tracking_id(key) {
        store.get_by_tracking(key)
    } else {
        store.get(key)
    };
    found.ok_or_else(|| anyhow::anyhow!("Grievance not found: {}", key))
}

fn print_timeline(grievance: &Grievance, date_format: &str) {
    println!("{}", "Timeline:".bold());
    for event in &grievance.timeline {
        println!(
            "  {}  {}  {} ({})",
            event.timestamp.format(date_format),
            status_colored(event.status),
            event.message,
            event.by.dimmed()
        );
    }
}

fn status_colored(status: Status) -> colored::ColoredString {
    match status {
        Status::Pending => "pending".white(),
        Status::InProgress => "in-progress".yellow(),
        Status::Resolved => "resolved".green(),
        Status::Escalated => "escalated".red(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
