//! ParseRank Example
//!
//! Races three ways of summing a vector, plus one deliberately wrong
//! candidate and one that panics, then prints both rankings.
//!
//! Run with: `cargo run --example sum_strategies`

use parserank::prelude::*;
use parserank::RankedMeasurement;

const N: u64 = 200_000;

fn ranking_line(ranked: &[RankedMeasurement]) -> String {
    let entries: Vec<RankEntry> = ranked.iter().map(RankEntry::from).collect();
    format_ranking(&entries)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let expected = N * (N - 1) / 2;
    let data: std::rc::Rc<Vec<u64>> = std::rc::Rc::new((0..N).collect());

    let mut suite: Suite<u64> = Suite::new(move |sum: &u64| {
        anyhow::ensure!(*sum == expected, "Test Failed. Sum: {}", sum);
        Ok(())
    });

    let d = data.clone();
    suite.push(Candidate::new("iter-sum", move || {
        let d = d.clone();
        async move { Ok(d.iter().sum()) }
    }));
    let d = data.clone();
    suite.push(Candidate::new("fold", move || {
        let d = d.clone();
        async move { Ok(d.iter().fold(0, |acc, x| acc + x)) }
    }));
    let d = data.clone();
    suite.push(Candidate::new("index-loop", move || {
        let d = d.clone();
        async move {
            let mut sum = 0;
            for i in 0..d.len() {
                sum += d[i];
            }
            Ok(sum)
        }
    }));
    let d = data.clone();
    suite.push(Candidate::new("off-by-one", move || {
        let d = d.clone();
        async move { Ok(d.iter().skip(2).sum()) }
    }));
    suite.push(Candidate::new("panics", || async {
        let empty: Vec<u64> = Vec::new();
        Ok(empty[0])
    }));

    let run = suite.run(&(), &TimingConfig::new(20)?).await?;
    let rankings = rank_all(&run.measurements, Tolerance::new(0.5)?);

    println!("Ranking (strict): {}", ranking_line(&rankings.strict));
    println!("Ranking (±{}): {}", rankings.tolerance, ranking_line(&rankings.banded));
    Ok(())
}
