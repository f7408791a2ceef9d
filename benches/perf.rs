use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use molkky_terminal::form::TeamDraft;
use molkky_terminal::standings::{MatchResult, Team, calculate_totals, sort_teams};
use molkky_terminal::state::AppState;

fn sample_team(i: usize) -> Team {
    let matches = (0..6)
        .map(|round| MatchResult {
            win: ((i + round) % 2) as u32,
            tie: ((i * 3 + round) % 5 == 0) as u32,
            loss: ((i + round + 1) % 2) as u32,
            points: ((i * 7 + round * 11) % 50) as i64,
            signature: String::new(),
        })
        .collect();
    Team::new(i.to_string(), format!("Team {i}"), matches)
}

fn bench_totals(c: &mut Criterion) {
    let team = sample_team(3);
    c.bench_function("calculate_totals_6_rounds", |b| {
        b.iter(|| black_box(calculate_totals(black_box(&team.matches))))
    });
}

fn bench_sort(c: &mut Criterion) {
    let teams: Vec<Team> = (0..128).map(sample_team).collect();
    c.bench_function("sort_teams_128", |b| {
        b.iter(|| black_box(sort_teams(black_box(&teams))))
    });
}

fn bench_submit(c: &mut Criterion) {
    let seed: Vec<Team> = (0..64).map(sample_team).collect();
    c.bench_function("submit_team_into_64", |b| {
        b.iter(|| {
            let mut state = AppState::new();
            state.load_teams(seed.clone());
            state.submit_team(TeamDraft {
                no: "new".to_string(),
                name: "New".to_string(),
                matches: vec![MatchResult::new(1, 0, 0, 3); 6],
            });
            black_box(state.teams.len());
        })
    });
}

criterion_group!(benches, bench_totals, bench_sort, bench_submit);
criterion_main!(benches);
