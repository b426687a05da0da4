//! lab-runner: headless runner for the Decision Labs experiments.
//!
//! Usage:
//!   lab-runner airplane --p-showup 0.85 --p-couple 0.6 --samples 2000 --rule overlay
//!   lab-runner convergence --dist binomial --p 0.3 --trials 10 --draws 20000 --every 500
//!   lab-runner rank --votes fresh:2:0,loved:95:5
//!   lab-runner airplane --config data/lab_config.json --json

use anyhow::{bail, Result};
use decision_labs_core::{
    airplane::{self, MixRule},
    config::LabConfig,
    convergence::{self, DistributionSpec},
    ranking::{self, VotedItem},
    report::LabReport,
    tabulate::Pmf,
};
use std::collections::BTreeMap;
use std::env;

const BAR_WIDTH: f64 = 40.0;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let experiment = args.get(1).map(String::as_str).unwrap_or("airplane");
    let json = args.iter().any(|a| a == "--json");

    let config = match find_arg(&args, "--config") {
        Some(path) => LabConfig::load(path)?,
        None => LabConfig::default(),
    };

    log::info!("lab-runner: running {experiment}");
    let report = match experiment {
        "airplane" => run_airplane(&args, &config)?,
        "convergence" => run_convergence(&args, &config)?,
        "rank" => run_ranking(&args, &config)?,
        other => bail!("Unknown experiment '{other}' (expected airplane|convergence|rank)"),
    };

    if json {
        println!("{}", report.to_json()?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn run_airplane(args: &[String], config: &LabConfig) -> Result<LabReport> {
    let defaults = &config.airplane;
    let rule = match find_arg(args, "--rule") {
        Some(name) => name.parse::<MixRule>()?,
        None => defaults.params.rule,
    };
    let params = airplane::ShowUpParams::new(
        parse_arg(args, "--p-showup", defaults.params.p_showup)?,
        parse_arg(args, "--p-couple", defaults.params.p_couple)?,
    )
    .with_samples(parse_arg(args, "--samples", defaults.params.nr_samples)?)
    .with_seed(parse_arg(args, "--seed", defaults.params.seed)?)
    .with_rule(rule);

    let table = airplane::simulate(&params)?;
    let singles = airplane::singles_baseline(params.p_showup, params.nr_samples, defaults.singles_seed)?;
    Ok(LabReport::airplane(&table, singles, defaults.overbooked_at))
}

fn run_convergence(args: &[String], config: &LabConfig) -> Result<LabReport> {
    let defaults = &config.convergence;
    let distribution = match find_arg(args, "--dist") {
        Some(name) => {
            let mut params = BTreeMap::new();
            for (flag, key) in [("--lam", "lam"), ("--p", "p"), ("--trials", "n")] {
                if let Some(value) = find_arg(args, flag) {
                    params.insert(key.to_string(), parse_value(flag, value)?);
                }
            }
            DistributionSpec::from_name(name, &params)?
        }
        None => defaults.distribution,
    };
    let params = convergence::ConvergenceParams::new(parse_arg(args, "--draws", defaults.params.n)?)
        .with_stride(parse_arg(args, "--every", defaults.params.sample_every_n)?)
        .with_repetitions(parse_arg(args, "--repetitions", defaults.params.nr_repetitions)?)
        .with_seed(parse_arg(args, "--seed", defaults.params.seed)?);

    let run = convergence::simulate_convergence(&distribution, &params)?;
    Ok(LabReport::convergence(&params, &run))
}

fn run_ranking(args: &[String], config: &LabConfig) -> Result<LabReport> {
    let items = match find_arg(args, "--votes") {
        Some(spec) => parse_votes(spec)?,
        None => config.ranking.items.clone(),
    };
    Ok(LabReport::ranking(ranking::rank_by_lower_bound(items)))
}

/// "label:up:down,label:up:down"
fn parse_votes(spec: &str) -> Result<Vec<VotedItem>> {
    spec.split(',')
        .filter(|s| !s.is_empty())
        .map(|entry| -> Result<VotedItem> {
            let parts: Vec<&str> = entry.split(':').collect();
            let [label, up, down] = parts.as_slice() else {
                bail!("Bad vote entry '{entry}', expected label:up:down");
            };
            Ok(VotedItem {
                label: label.to_string(),
                upvotes: up.parse()?,
                downvotes: down.parse()?,
            })
        })
        .collect()
}

fn print_summary(report: &LabReport) {
    match report {
        LabReport::Airplane {
            params,
            show_up_pmf,
            singles_pmf,
            overbooked_share,
        } => {
            println!("=== AIRPLANE PROBLEM ===");
            println!("  p_showup:   {}", params.p_showup);
            println!("  p_couple:   {}", params.p_couple);
            println!("  samples:    {}", params.nr_samples);
            println!("  seed:       {}", params.seed);
            println!("  rule:       {:?}", params.rule);
            println!();
            println!("  Probably mixed:");
            print_pmf(show_up_pmf);
            println!("  If only singles:");
            print_pmf(singles_pmf);
            println!();
            println!("  overbooked: {:.1}% of flights", overbooked_share * 100.0);
        }
        LabReport::Convergence {
            distribution,
            parameter,
            variance,
            checkpoints,
            ..
        } => {
            println!("=== LAW OF LARGE NUMBERS ===");
            println!("  distribution: {distribution:?}");
            println!("  parameter:    {parameter:.4}");
            println!("  variance:     {variance:.4}");
            println!();
            println!("  {:>8}  {:>10}  {:>10}  running means", "n", "rmse", "sqrt(v/n)");
            for c in checkpoints {
                let means: Vec<String> = c.partial_average.iter().map(|m| format!("{m:.4}")).collect();
                println!(
                    "  {:>8}  {:>10.5}  {:>10.5}  {}",
                    c.sample_size,
                    c.rmse,
                    c.theoretical_rmse,
                    means.join(" ")
                );
            }
        }
        LabReport::Ranking { items } => {
            println!("=== WILSON LOWER-BOUND RANKING ===");
            for r in items {
                println!(
                    "  {:>3}. {:<20} up={:<6} down={:<6} mean={:.3} lower={:.3}",
                    r.rank,
                    r.item.label,
                    r.item.upvotes,
                    r.item.downvotes,
                    r.interval.mean,
                    r.interval.lower_bound()
                );
            }
        }
    }
}

fn print_pmf(pmf: &Pmf) {
    for (outcome, p) in pmf.probabilities() {
        let bar = "#".repeat((p * BAR_WIDTH).round() as usize);
        println!("    {outcome}: {p:>6.3} {bar}");
    }
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Missing flag: `default`. Present but unparsable: an error, never the default.
fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> Result<T> {
    match find_arg(args, flag) {
        Some(value) => parse_value(flag, value),
        None => Ok(default),
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T> {
    match value.parse() {
        Ok(parsed) => Ok(parsed),
        Err(_) => bail!("Invalid value '{value}' for {flag}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn missing_flag_uses_default() {
        let a = args(&["lab-runner", "airplane", "--samples", "10"]);
        assert_eq!(parse_arg(&a, "--p-showup", 0.85).unwrap(), 0.85);
        assert_eq!(parse_arg(&a, "--samples", 5000usize).unwrap(), 10);
    }

    #[test]
    fn unparsable_value_is_an_error_not_the_default() {
        let a = args(&["lab-runner", "airplane", "--p-showup", "1.2x"]);
        let err = parse_arg(&a, "--p-showup", 0.85).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value '1.2x' for --p-showup");
    }

    #[test]
    fn bad_flag_value_fails_the_whole_experiment() {
        let config = LabConfig::default();

        let a = args(&["lab-runner", "airplane", "--p-showup", "1.2x", "--samples", "10"]);
        assert!(run_airplane(&a, &config).is_err());

        let c = args(&["lab-runner", "convergence", "--draws", "0x", "--json"]);
        let err = run_convergence(&c, &config).unwrap_err();
        assert!(err.to_string().contains("--draws"), "{err}");

        let d = args(&["lab-runner", "convergence", "--dist", "poisson", "--lam", "four"]);
        assert!(run_convergence(&d, &config).is_err());
    }

    #[test]
    fn valid_flags_override_config() {
        let config = LabConfig::default();
        let a = args(&["lab-runner", "airplane", "--p-showup", "0.5", "--samples", "10"]);
        let LabReport::Airplane { params, .. } = run_airplane(&a, &config).unwrap() else {
            panic!("expected an airplane report");
        };
        assert_eq!(params.p_showup, 0.5);
        assert_eq!(params.nr_samples, 10);
    }

    #[test]
    fn vote_entries_need_three_parts() {
        assert_eq!(parse_votes("a:3:1,b:0:0").unwrap().len(), 2);
        assert!(parse_votes("a:3").is_err());
        assert!(parse_votes("a:x:1").is_err());
    }
}
