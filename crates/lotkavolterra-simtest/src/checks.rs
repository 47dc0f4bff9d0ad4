//! Self-check suite for the `validate` command.
//!
//! Each section builds luncheons through the public engine API and
//! records a pass/fail line per property.

use lotkavolterra_logic::config::{validate_config, InteractionRates, SimulationConfig};
use lotkavolterra_logic::group::Group;
use lotkavolterra_logic::input::{build_luncheon, LuncheonFile};
use lotkavolterra_logic::seating::{test_luncheon, SeatingRule};
use lotkavolterra_logic::snapshot::RunHistory;
use lotkavolterra_logic::{Luncheon, LuncheonError, Table};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ── Sample luncheon (same JSON the docs use) ────────────────────────────
const SAMPLE_JSON: &str = include_str!("../../../data/luncheons/sample.json");

struct CheckResult {
    name: String,
    passed: bool,
    detail: String,
}

/// Run every section and print the report. Returns true when all passed.
pub fn run_all(verbose: bool) -> bool {
    println!("=== Lotka-Volterra Luncheon Checks ===\n");

    let mut results = Vec::new();
    results.extend(check_config());
    results.extend(check_sample_input(verbose));
    results.extend(check_scenarios());
    results.extend(check_invariants(verbose));
    results.extend(check_random_groups());

    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed,
        results.len(),
        failed
    );
    failed == 0
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn check_config() -> Vec<CheckResult> {
    println!("--- Configuration ---");
    let errors = validate_config(&SimulationConfig::default());
    vec![CheckResult {
        name: "config_defaults_valid".into(),
        passed: errors.is_empty(),
        detail: format!("{} errors", errors.len()),
    }]
}

// ── 2. Sample input ─────────────────────────────────────────────────────

fn check_sample_input(verbose: bool) -> Vec<CheckResult> {
    println!("--- Sample Input ---");
    let mut results = Vec::new();

    let file = match LuncheonFile::from_json(SAMPLE_JSON) {
        Ok(f) => f,
        Err(e) => {
            results.push(CheckResult {
                name: "sample_parse".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    let mut rng = StdRng::seed_from_u64(1);
    let mut luncheon = match build_luncheon(&file, 1000, InteractionRates::default(), &mut rng) {
        Ok(l) => l,
        Err(e) => {
            results.push(CheckResult {
                name: "sample_build".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    results.push(CheckResult {
        name: "sample_seat_count".into(),
        passed: luncheon.seat_count() == file.seat_count(),
        detail: format!(
            "{} tables, {} seats",
            luncheon.tables().len(),
            luncheon.seat_count()
        ),
    });

    let keys: Vec<u64> = luncheon.seats().map(|s| s.primary_key).collect();
    let sequential = keys.iter().enumerate().all(|(i, &k)| k == i as u64);
    results.push(CheckResult {
        name: "sample_sequential_keys".into(),
        passed: sequential,
        detail: format!("keys {:?}", keys),
    });

    match RunHistory::record(&mut luncheon, 20) {
        Ok(history) => {
            if verbose {
                for g in &history.generations {
                    println!(
                        "  gen {:3}: pack={:6} herd={:6}",
                        g.generation, g.totals.pack, g.totals.herd
                    );
                }
            }
            results.push(CheckResult {
                name: "sample_run_20_generations".into(),
                passed: history.generations.len() == 20,
                detail: format!("{} snapshots", history.generations.len()),
            });
        }
        Err(e) => results.push(CheckResult {
            name: "sample_run_20_generations".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    results
}

// ── 3. Scenarios ────────────────────────────────────────────────────────

fn check_scenarios() -> Vec<CheckResult> {
    println!("--- Scenarios ---");
    let mut results = Vec::new();
    let rates = InteractionRates::default();

    // One pack meets one herd
    let mut table = Table::new("Pair");
    let pair = table
        .push(0, "Alice", Group::Pack, 1000)
        .and_then(|_| table.push(1, "Bob", Group::Herd, 1000))
        .and_then(|_| table.all_seats_interact(&rates));
    let sizes = table.export_seat_sizes();
    results.push(CheckResult {
        name: "pair_predation".into(),
        passed: pair.is_ok()
            && sizes[0] > 1000
            && sizes[1] < 1000
            && sizes.iter().all(|&s| s <= rates.carrying_capacity),
        detail: format!("pack={} herd={}", sizes[0], sizes[1]),
    });

    // Halves, zero generations
    let mut rng = StdRng::seed_from_u64(0);
    let halves = test_luncheon(SeatingRule::Halves, 10, 1000, rates.clone(), &mut rng)
        .and_then(|mut l| RunHistory::record(&mut l, 0));
    let (passed, detail) = match &halves {
        Ok(history) => {
            let seats = &history.initial_state[0].seats;
            let packs = seats.iter().filter(|s| s.group == Group::Pack).count();
            let ok = seats.len() == 10
                && seats.iter().take(5).all(|s| s.group == Group::Pack)
                && seats.iter().all(|s| s.population_size == 1000);
            (ok, format!("{} pack, {} herd", packs, seats.len() - packs))
        }
        Err(e) => (false, e.to_string()),
    };
    results.push(CheckResult {
        name: "halves_initial_state".into(),
        passed,
        detail,
    });

    results
}

// ── 4. Invariants ───────────────────────────────────────────────────────

fn random_table(
    name: &str,
    first_pk: u64,
    seats: usize,
    rng: &mut StdRng,
) -> Result<Table, LuncheonError> {
    let mut table = Table::new(name);
    for i in 0..seats {
        let group = Group::random(rng);
        let size = rng.gen_range(0..=5_000i64);
        table.push(first_pk + i as u64, format!("P{i}"), group, size)?;
    }
    Ok(table)
}

/// Same seats as `table`, seated in reverse order.
fn reversed_table(table: &Table) -> Result<Table, LuncheonError> {
    let mut reversed = Table::new(format!("{} reversed", table.name));
    for seat in table.get_seats().iter().rev() {
        reversed.push(
            seat.primary_key,
            seat.name.clone(),
            seat.group,
            seat.population_size() as i64,
        )?;
    }
    Ok(reversed)
}

fn check_invariants(verbose: bool) -> Vec<CheckResult> {
    println!("--- Invariants ---");
    let mut results = Vec::new();
    let rates = InteractionRates::default();
    let mut rng = StdRng::seed_from_u64(2024);

    let tables = random_table("A", 0, 12, &mut rng)
        .and_then(|a| random_table("B", 100, 8, &mut rng).map(|b| (a, b)));
    let (table_a, table_b) = match tables {
        Ok(pair) => pair,
        Err(e) => {
            results.push(CheckResult {
                name: "invariant_tables".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    // Bounds over a long run
    let mut luncheon = Luncheon::new("Bounds", rates.clone());
    let built = luncheon
        .add_table(table_a.clone())
        .and_then(|_| luncheon.add_table(table_b.clone()));
    let mut max_seen = 0;
    let mut ran = built.is_ok();
    for _ in 0..100 {
        if !ran || luncheon.run_generation().is_err() {
            ran = false;
            break;
        }
        max_seen = max_seen.max(luncheon.export_seat_sizes().into_iter().max().unwrap_or(0));
    }
    results.push(CheckResult {
        name: "population_bounds".into(),
        passed: ran && max_seen <= rates.carrying_capacity,
        detail: format!("max size {} after 100 generations", max_seen),
    });

    // Tables alone vs together
    let mut together = Luncheon::new("Together", rates.clone());
    let mut alone_a = table_a;
    let mut alone_b = table_b;
    let isolated = together
        .add_table(alone_a.clone())
        .and_then(|_| together.add_table(alone_b.clone()))
        .and_then(|_| together.run_generations(15))
        .and_then(|_| alone_a.run_generations(15, &rates))
        .and_then(|_| alone_b.run_generations(15, &rates));
    let (passed, detail) = match isolated {
        Ok(()) => (
            together.tables()[0].export_seat_sizes() == alone_a.export_seat_sizes()
                && together.tables()[1].export_seat_sizes() == alone_b.export_seat_sizes(),
            "two tables, 15 generations".to_string(),
        ),
        Err(e) => (false, e.to_string()),
    };
    results.push(CheckResult {
        name: "table_isolation".into(),
        passed,
        detail,
    });

    // Reversed seating gives the same per-seat outcome
    let tables = random_table("F", 0, 10, &mut rng)
        .and_then(|f| reversed_table(&f).map(|r| (f, r)));
    let ordered = tables.and_then(|(mut forward, mut reversed)| {
        forward.run_generations(5, &rates)?;
        reversed.run_generations(5, &rates)?;
        Ok((forward, reversed))
    });
    let (passed, detail) = match ordered {
        Ok((forward, reversed)) => {
            let mut rev_sizes = reversed.export_seat_sizes();
            rev_sizes.reverse();
            if verbose {
                println!("  forward sizes:  {:?}", forward.export_seat_sizes());
            }
            (
                forward.export_seat_sizes() == rev_sizes,
                "10 seats, reversed seating, 5 generations".to_string(),
            )
        }
        Err(e) => (false, e.to_string()),
    };
    results.push(CheckResult {
        name: "order_independence".into(),
        passed,
        detail,
    });

    results
}

// ── 5. Random groups ────────────────────────────────────────────────────

fn check_random_groups() -> Vec<CheckResult> {
    println!("--- Random Groups ---");
    let draws = 10_000;
    let packs = (0..draws)
        .filter(|_| lotkavolterra_logic::random_group() == Group::Pack)
        .count();
    let ratio = packs as f64 / draws as f64;
    vec![CheckResult {
        name: "random_group_balance".into(),
        passed: (0.45..=0.55).contains(&ratio),
        detail: format!("pack ratio {:.3}", ratio),
    }]
}
