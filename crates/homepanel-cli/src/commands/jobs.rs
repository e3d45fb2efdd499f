//! Scheduler commands

use super::Context;
use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use homepanel_core::Route;
use homepanel_types::{NewJob, Task, Trigger};

/// Build a trigger from the mutually exclusive `--cron`, `--every` and `--at` flags
pub fn parse_trigger(
    cron: Option<String>,
    every: Option<u64>,
    at: Option<String>,
) -> Result<Trigger> {
    match (cron, every, at) {
        (Some(expression), None, None) => Ok(Trigger::Cron { expression }),
        (None, Some(seconds), None) => Ok(Trigger::Interval { seconds }),
        (None, None, Some(at)) => {
            let run_at = DateTime::parse_from_rfc3339(&at)
                .with_context(|| format!("Invalid date '{}', expected RFC 3339", at))?
                .with_timezone(&Utc);
            Ok(Trigger::Date { run_at })
        }
        _ => anyhow::bail!("Pass exactly one of --cron, --every or --at"),
    }
}

pub async fn list(ctx: &Context) -> Result<()> {
    let api = ctx.guard(Route::Scheduler).await?;
    let jobs = api.jobs().await?;

    println!("{}", "⏰ Scheduled jobs".blue().bold());
    println!();
    if jobs.is_empty() {
        println!("   (No jobs)");
    }
    for job in jobs {
        let status = if job.enabled {
            "✓".green()
        } else {
            "⏸".yellow()
        };
        println!(
            "   {} {} {} - {}, {}",
            status,
            format!("#{}", job.id).dimmed(),
            job.name.cyan(),
            job.task,
            job.trigger
        );
        if let Some(next) = job.next_run {
            println!(
                "      next run {}",
                next.format("%Y-%m-%d %H:%M").to_string().dimmed()
            );
        }
    }
    Ok(())
}

pub async fn add(ctx: &Context, name: &str, task: Task, trigger: Trigger) -> Result<()> {
    let api = ctx.guard(Route::Scheduler).await?;
    let job = api
        .create_job(&NewJob {
            name: name.to_string(),
            task,
            trigger,
        })
        .await?;
    println!(
        "{} Scheduled {} (#{}): {}, {}",
        "✓".green(),
        job.name.cyan(),
        job.id,
        job.task,
        job.trigger
    );
    Ok(())
}

pub async fn set_enabled(ctx: &Context, id: i64, enabled: bool) -> Result<()> {
    let api = ctx.guard(Route::Scheduler).await?;
    let job = api.set_job_enabled(id, enabled).await?;
    println!(
        "{} Job {} {}",
        "✓".green(),
        job.name.cyan(),
        if job.enabled { "enabled" } else { "paused" }
    );
    Ok(())
}

pub async fn delete(ctx: &Context, id: i64) -> Result<()> {
    let api = ctx.guard(Route::Scheduler).await?;
    api.delete_job(id).await?;
    println!("{} Deleted job #{}", "✓".green(), id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trigger_variants() {
        assert_eq!(
            parse_trigger(Some("0 7 * * 1-5".into()), None, None).unwrap(),
            Trigger::Cron {
                expression: "0 7 * * 1-5".into()
            }
        );
        assert_eq!(
            parse_trigger(None, Some(900), None).unwrap(),
            Trigger::Interval { seconds: 900 }
        );

        let Trigger::Date { run_at } =
            parse_trigger(None, None, Some("2026-12-24T18:00:00+01:00".into())).unwrap()
        else {
            panic!("expected a date trigger");
        };
        assert_eq!(run_at.to_rfc3339(), "2026-12-24T17:00:00+00:00");
    }

    #[test]
    fn test_parse_trigger_needs_exactly_one() {
        assert!(parse_trigger(None, None, None).is_err());
        assert!(parse_trigger(Some("* * * * *".into()), Some(60), None).is_err());
        assert!(parse_trigger(None, None, Some("tomorrow".into())).is_err());
    }
}
