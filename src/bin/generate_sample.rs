use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

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

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

fn round(v: f64, places: i32) -> f64 {
    let f = 10f64.powi(places);
    (v * f).round() / f
}

/// A value column: scale/BP readings are daily with occasional skips,
/// blood panels only on draw days.
struct Column {
    name: &'static str,
    values: Vec<Option<f64>>,
}

const DAYS: i64 = 120;
const BLOOD_DRAW_EVERY: i64 = 30;

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let start = NaiveDate::from_ymd_opt(2024, 11, 1).context("invalid start date")?;
    let dates: Vec<NaiveDate> = (0..DAYS).map(|i| start + Duration::days(i)).collect();

    let mut weight = Vec::new();
    let mut fat = Vec::new();
    let mut fat_corrected = Vec::new();
    let mut lean = Vec::new();
    let mut sys = Vec::new();
    let mut dia = Vec::new();
    let mut pulse = Vec::new();
    let mut context: Vec<Option<String>> = Vec::new();

    for (i, _) in dates.iter().enumerate() {
        let trend = i as f64 / DAYS as f64;

        // Scale readings: slow downward trend, a few missed days.
        if rng.chance(0.9) {
            let w = 84.0 - 3.0 * trend + rng.gauss(0.0, 0.3);
            let bf = 25.0 - 2.0 * trend + rng.gauss(0.0, 0.4);
            weight.push(Some(round(w, 1)));
            fat.push(Some(round(bf, 1)));
            fat_corrected.push(Some(round(bf - 1.5, 1)));
            lean.push(Some(round(w * (1.0 - bf / 100.0) / 6.35029, 2)));
        } else {
            weight.push(None);
            fat.push(None);
            fat_corrected.push(None);
            lean.push(None);
        }

        // Blood pressure is taken most mornings.
        if rng.chance(0.8) {
            sys.push(Some(rng.gauss(128.0 - 6.0 * trend, 4.0).round()));
            dia.push(Some(rng.gauss(82.0 - 3.0 * trend, 3.0).round()));
            pulse.push(Some(rng.gauss(64.0, 4.0).round()));
        } else {
            sys.push(None);
            dia.push(None);
            pulse.push(None);
        }

        context.push(match i % 17 {
            5 => Some("travel".to_string()),
            11 => Some("poor sleep".to_string()),
            _ => None,
        });
    }

    let mut panel = |name: &'static str, mean: f64, sd: f64, places: i32| Column {
        name,
        values: (0..DAYS)
            .map(|i| (i % BLOOD_DRAW_EVERY == 0).then(|| round(rng.gauss(mean, sd), places)))
            .collect(),
    };

    let bloods = vec![
        panel("Hormone_Testosterone", 18.0, 2.0, 1),
        panel("Hormone_Oestradiol", 95.0, 10.0, 0),
        panel("FBC_Haemoglobin", 150.0, 5.0, 0),
        panel("FBC_WBC", 6.0, 0.8, 1),
        panel("FBC_Platelets", 250.0, 25.0, 0),
        panel("Lipid_TotalCholesterol", 5.2, 0.3, 1),
        panel("Lipid_LDL", 3.1, 0.3, 1),
        panel("Lipid_HDL", 1.3, 0.1, 2),
        panel("Vitamin_D", 60.0, 8.0, 0),
        panel("Vitamin_B12", 420.0, 40.0, 0),
        panel("PSA", 0.8, 0.1, 2),
        panel("TSH", 1.9, 0.3, 2),
    ];

    let mut columns = vec![
        Column { name: "Weight_kg", values: weight },
        Column { name: "RENPHO_BodyFat_pct", values: fat },
        Column { name: "RENPHO_BodyFat_pct_corrected", values: fat_corrected },
        Column { name: "RENPHO_LeanMass_st", values: lean },
        Column { name: "BP_Systolic", values: sys },
        Column { name: "BP_Diastolic", values: dia },
        Column { name: "BP_Pulse", values: pulse },
    ];
    columns.extend(bloods);

    write_csv("sample_health.csv", &dates, &columns, &context)?;
    write_parquet("sample_health.parquet", &dates, &columns, &context)?;

    println!(
        "Wrote {} days x {} columns to sample_health.csv and sample_health.parquet",
        dates.len(),
        columns.len() + 2
    );
    Ok(())
}

fn write_csv(
    path: &str,
    dates: &[NaiveDate],
    columns: &[Column],
    context: &[Option<String>],
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;

    let mut header = vec!["Date"];
    header.extend(columns.iter().map(|c| c.name));
    header.push("Context");
    writer.write_record(&header)?;

    for (i, date) in dates.iter().enumerate() {
        let mut record = vec![date.format("%Y-%m-%d").to_string()];
        record.extend(
            columns
                .iter()
                .map(|c| c.values[i].map(|v| v.to_string()).unwrap_or_default()),
        );
        record.push(context[i].clone().unwrap_or_default());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(
    path: &str,
    dates: &[NaiveDate],
    columns: &[Column],
    context: &[Option<String>],
) -> Result<()> {
    let epoch = NaiveDate::default();
    let days: Vec<i32> = dates
        .iter()
        .map(|d| i32::try_from((*d - epoch).num_days()))
        .collect::<Result<_, _>>()
        .context("date out of range")?;

    let mut fields = vec![Field::new("Date", DataType::Date32, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(Date32Array::from(days))];
    for col in columns {
        fields.push(Field::new(col.name, DataType::Float64, true));
        arrays.push(Arc::new(Float64Array::from(col.values.clone())));
    }
    fields.push(Field::new("Context", DataType::Utf8, true));
    arrays.push(Arc::new(StringArray::from(context.to_vec())));

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
