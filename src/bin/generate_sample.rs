use std::collections::BTreeMap;

/// Fixed year-range buckets matching the dashboard's filter table.
const YEAR_RANGES: [(i32, i32); 5] = [
    (2018, 2020),
    (2021, 2022),
    (2023, 2024),
    (2025, 2026),
    (2027, 2028),
];

const CBSA: &str = "Denver-Aurora-Lakewood, CO";

/// Denver submarkets with plausible centers (longitude, latitude).
const SUBMARKETS: [(&str, f64, f64); 10] = [
    ("Five Points", -104.9748, 39.7553),
    ("Capitol Hill", -104.9803, 39.7312),
    ("Highland", -105.0125, 39.7621),
    ("Cherry Creek", -104.9530, 39.7169),
    ("Washington Park", -104.9697, 39.7009),
    ("Aurora", -104.8250, 39.7100),
    ("Lakewood", -105.0814, 39.7047),
    ("Littleton", -105.0166, 39.6133),
    ("Westminster", -105.0372, 39.8367),
    ("Glendale", -104.9347, 39.7051),
];

const STREETS: [&str; 20] = [
    "Alton", "Blake", "Curtis", "Delgany", "Emerson", "Fox", "Galapago", "Humboldt", "Inca",
    "Josephine", "Kalamath", "Larimer", "Marion", "Navajo", "Osage", "Pearl", "Stout", "Tejon",
    "Wazee", "Zuni",
];

const SUFFIXES: [&str; 8] = [
    "Flats",
    "Lofts",
    "Residences",
    "Commons",
    "Yard",
    "Station",
    "Place",
    "Heights",
];

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

    fn int_in(&mut self, lo: i32, hi: i32) -> i32 {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as i32
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

struct Property {
    name: String,
    submarket: &'static str,
    year_start: Option<i32>,
    year_complete: Option<i32>,
    unit_count: u32,
    latitude: f64,
    longitude: f64,
    status: &'static str,
}

fn status_for(year_complete: Option<i32>) -> &'static str {
    match year_complete {
        Some(year) if year <= 2024 => "Delivered",
        Some(year) if year <= 2026 => "Under Construction",
        _ => "Proposed",
    }
}

fn bucket_index(year: i32) -> Option<usize> {
    YEAR_RANGES
        .iter()
        .position(|&(start, end)| start <= year && year <= end)
}

fn make_property(
    rng: &mut SimpleRng,
    submarket: &'static str,
    lon: f64,
    lat: f64,
    year_start: i32,
) -> Property {
    let year_complete = year_start + rng.int_in(1, 3);
    // Some proposed projects have no completion date yet.
    let year_complete = if year_complete >= 2027 && rng.next_f64() < 0.25 {
        None
    } else {
        Some(year_complete)
    };
    let unit_count = rng.gauss(180.0, 60.0).max(20.0) as u32;

    Property {
        name: format!("{} {}", rng.pick(&STREETS), rng.pick(&SUFFIXES)),
        submarket,
        year_start: Some(year_start),
        year_complete,
        unit_count,
        latitude: lat + rng.gauss(0.0, 0.008),
        longitude: lon + rng.gauss(0.0, 0.010),
        status: status_for(year_complete),
    }
}

fn boundary_ring(rng: &mut SimpleRng, lon: f64, lat: f64) -> Vec<[f64; 2]> {
    let mut ring: Vec<[f64; 2]> = (0..8)
        .map(|k| {
            let angle = std::f64::consts::TAU * k as f64 / 8.0;
            let stretch = 0.8 + 0.4 * rng.next_f64();
            [
                lon + 0.022 * stretch * angle.cos(),
                lat + 0.017 * stretch * angle.sin(),
            ]
        })
        .collect();
    ring.push(ring[0]);
    ring
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // ---- Property pipeline ----
    let mut properties: Vec<Property> = Vec::new();
    for &(submarket, lon, lat) in &SUBMARKETS {
        // A couple of legacy projects started before the bucket table opens.
        for _ in 0..rng.int_in(1, 2) {
            let year_start = rng.int_in(2015, 2017);
            let mut p = make_property(&mut rng, submarket, lon, lat, year_start);
            p.year_complete = Some(year_start + rng.int_in(1, 3));
            p.status = status_for(p.year_complete);
            properties.push(p);
        }
        for &(start, end) in &YEAR_RANGES {
            for _ in 0..rng.int_in(2, 5) {
                let year_start = rng.int_in(start, end);
                properties.push(make_property(&mut rng, submarket, lon, lat, year_start));
            }
        }
    }

    std::fs::create_dir_all("data").expect("Failed to create data directory");

    let pipeline_path = "data/denver_pipeline.csv";
    let mut writer = csv::Writer::from_path(pipeline_path).expect("Failed to create pipeline CSV");
    writer
        .write_record([
            "PropertyName",
            "SubmarketName",
            "YearStart",
            "YearComplete",
            "UnitCount",
            "Latitude",
            "Longitude",
            "ConstructionStatus",
        ])
        .expect("Failed to write header");
    for p in &properties {
        writer
            .write_record([
                p.name.clone(),
                p.submarket.to_string(),
                p.year_start.map(|y| y.to_string()).unwrap_or_default(),
                p.year_complete.map(|y| y.to_string()).unwrap_or_default(),
                p.unit_count.to_string(),
                format!("{:.6}", p.latitude),
                format!("{:.6}", p.longitude),
                p.status.to_string(),
            ])
            .expect("Failed to write property row");
    }
    writer.flush().expect("Failed to flush pipeline CSV");

    // ---- Demand / supply table ----
    // Supply per submarket and bucket follows the completions generated
    // above, so the two files stay consistent.
    let mut supply_by_bucket: BTreeMap<(&str, usize), f64> = BTreeMap::new();
    for p in &properties {
        if let Some(idx) = p.year_complete.and_then(bucket_index) {
            *supply_by_bucket.entry((p.submarket, idx)).or_insert(0.0) +=
                f64::from(p.unit_count);
        }
    }

    let ratio_path = "data/denver_demand_supply.csv";
    let mut writer = csv::Writer::from_path(ratio_path).expect("Failed to create ratio CSV");
    writer
        .write_record(["SubmarketName", "YearRange", "Demand", "Supply"])
        .expect("Failed to write header");
    let mut ratio_rows = 0usize;
    for &(submarket, _, _) in &SUBMARKETS {
        for (idx, &(start, end)) in YEAR_RANGES.iter().enumerate() {
            let supply = supply_by_bucket
                .get(&(submarket, idx))
                .copied()
                .unwrap_or(0.0);
            let demand = if supply > 0.0 {
                (supply * rng.gauss(1.05, 0.30)).max(0.0)
            } else {
                rng.gauss(120.0, 40.0).max(0.0)
            };
            writer
                .write_record([
                    submarket.to_string(),
                    format!("{start}-{end}"),
                    format!("{demand:.1}"),
                    format!("{supply:.1}"),
                ])
                .expect("Failed to write ratio row");
            ratio_rows += 1;
        }
    }
    writer.flush().expect("Failed to flush ratio CSV");

    // ---- Submarket boundaries ----
    let features: Vec<serde_json::Value> = SUBMARKETS
        .iter()
        .map(|&(name, lon, lat)| {
            serde_json::json!({
                "type": "Feature",
                "properties": { "SubName": name, "CBSAName": CBSA },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [boundary_ring(&mut rng, lon, lat)],
                },
            })
        })
        .collect();
    let collection = serde_json::json!({
        "type": "FeatureCollection",
        "features": features,
    });

    let boundary_path = "data/denver_submarkets.geojson";
    std::fs::write(
        boundary_path,
        serde_json::to_string_pretty(&collection).expect("Failed to serialize boundaries"),
    )
    .expect("Failed to write boundary GeoJSON");

    println!(
        "Wrote {} properties to {pipeline_path}, {ratio_rows} demand/supply rows to {ratio_path}, {} boundaries to {boundary_path}",
        properties.len(),
        SUBMARKETS.len()
    );
}
