//! Writes `sample_orders.csv` and a demonstration `FinalModel_DT.json` so the
//! detector can be tried without a production model.

use serde_json::json;

#[allow(dead_code)]
#[path = "../data/model.rs"]
mod model;

use model::{CollectType, CountryCode, Field, PaymentGroup};

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }

    fn token(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| ALPHANUMERIC[self.below(ALPHANUMERIC.len() as u64) as usize] as char)
            .collect()
    }

    /// Amount in cents rendered with two decimals.
    fn amount(&mut self, max_cents: u64) -> String {
        let cents = self.below(max_cents);
        format!("{}.{:02}", cents / 100, cents % 100)
    }
}

/// Hand-built tree over the default feature layout:
/// pickup orders with more than 2 refunds, or any order with more than
/// 5 associated customers, are flagged.
fn demo_model() -> serde_json::Value {
    json!({
        "model": {
            "type": "decision_tree",
            "nodes": [
                {"feature": 4, "threshold": 5.0, "left": 1, "right": 6},
                {"feature": 12, "threshold": 0.5, "left": 2, "right": 3},
                {"class": 0},
                {"feature": 2, "threshold": 2.0, "left": 4, "right": 5},
                {"class": 0},
                {"class": 1},
                {"class": 1}
            ]
        }
    })
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);

    let output_path = "sample_orders.csv";
    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record(Field::ALL.map(Field::name))?;

    let n_rows = 60;
    for _ in 0..n_rows {
        let orders = 1 + rng.below(40);
        let cancelled = rng.below(orders.min(6) + 1).to_string();
        let refunds = rng.below(orders.min(5) + 1).to_string();
        let order_id = format!("{}-{}", rng.token(4), rng.token(4));
        writer.write_record([
            rng.pick(CountryCode::NAMES).to_string(),
            rng.token(8),
            orders.to_string(),
            cancelled,
            refunds,
            rng.amount(5_000_000),
            rng.below(8).to_string(),
            order_id,
            rng.pick(CollectType::NAMES).to_string(),
            rng.amount(50_000),
            (1 + rng.below(10)).to_string(),
            rng.amount(10_000),
            rng.pick(PaymentGroup::NAMES).to_string(),
        ])?;
    }
    writer.flush()?;
    println!("Wrote {n_rows} orders to {output_path}");

    let model_path = "FinalModel_DT.json";
    std::fs::write(model_path, serde_json::to_string_pretty(&demo_model())?)?;
    println!("Wrote demonstration model to {model_path}");

    Ok(())
}
