use std::env;

/// A geographic region to scrape, as it appears in OLX URLs
#[derive(Debug, Clone, Copy)]
pub struct RegionTarget {
    pub slug: &'static str,
    pub name: &'static str,
}

/// Regions covered by each job run
pub const REGIONS: &[RegionTarget] = &[
    RegionTarget { slug: "jakarta-dki_g2000007", name: "DKI Jakarta" },
    RegionTarget { slug: "jakarta-selatan", name: "Jakarta Selatan" },
    RegionTarget { slug: "jakarta-barat", name: "Jakarta Barat" },
    RegionTarget { slug: "tangerang", name: "Tangerang" },
    RegionTarget { slug: "tangerang-selatan", name: "Tangerang Selatan" },
    RegionTarget { slug: "bekasi", name: "Bekasi" },
    RegionTarget { slug: "depok", name: "Depok" },
    RegionTarget { slug: "bogor", name: "Bogor" },
    RegionTarget { slug: "bandung", name: "Bandung" },
    RegionTarget { slug: "surabaya", name: "Surabaya" },
];

/// Runtime configuration resolved from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub postgres_url: Option<String>,
    pub target_per_region: usize,
    pub max_pages: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            supabase_url: env::var("SUPABASE_URL").ok(),
            // Service key takes precedence over the anon key name
            supabase_key: env::var("SUPABASE_SERVICE_KEY")
                .or_else(|_| env::var("SUPABASE_KEY"))
                .ok(),
            postgres_url: env::var("POSTGRES_URL").ok(),
            target_per_region: env::var("TARGET_PER_REGION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
            max_pages: env::var("MAX_PAGES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }
}
