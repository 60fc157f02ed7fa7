use std::cmp::Ordering;
use std::env;

// Vector tiers this crate can compile to
#[derive(PartialEq, Eq, Debug)]
struct CpuFeature {
    name: &'static str,
    // target features that must all be guaranteed by the build target
    required: &'static [&'static str],
    // cfg flags emitted when this tier is selected
    cfg_flags: &'static [&'static str],
    detected: bool,
}

impl CpuFeature {
    // Define priority order between tiers (Lowest number == Highest Priority)
    fn priority(&self) -> usize {
        match self.name {
            "avx2" => 0,
            "avx" => 1,
            _ => usize::MAX, // lowest priority by default
        }
    }

    fn features() -> Vec<CpuFeature> {
        vec![
            CpuFeature {
                name: "avx",
                required: &["avx"],
                cfg_flags: &["avx"],
                detected: false,
            },
            CpuFeature {
                name: "avx2",
                required: &["avx", "avx2", "fma"],
                cfg_flags: &["avx", "avx2"],
                detected: false,
            },
        ]
    }
}

impl Ord for CpuFeature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl PartialOrd for CpuFeature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct TargetDetector;
impl TargetDetector {
    fn is_x86() -> bool {
        let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
        arch == "x86" || arch == "x86_64"
    }

    // Features the target guarantees at compile time (e.g. -C target-cpu=native).
    // The host CPU is never probed: the binary may run elsewhere.
    fn detect_features(features: &mut [CpuFeature]) {
        let enabled = env::var("CARGO_CFG_TARGET_FEATURE").unwrap_or_default();
        let enabled: Vec<&str> = enabled.split(',').collect();

        for feature in features.iter_mut() {
            feature.detected = feature.required.iter().all(|f| enabled.contains(f));
        }
    }

    fn apply(features: &mut [CpuFeature]) {
        // Sort features by priority (highest first)
        features.sort();

        let cfg_flags: &[&str] = features
            .iter()
            .find(|cpu_feature| cpu_feature.detected)
            .map(|cpu_feature| cpu_feature.cfg_flags)
            .unwrap_or(&["fallback"]);

        println!("applying: {cfg_flags:?}");

        for flag in cfg_flags {
            println!("cargo:rustc-cfg={flag}");
        }

        println!("cargo::rustc-check-cfg=cfg(avx)");
        println!("cargo::rustc-check-cfg=cfg(avx2)");
        println!("cargo::rustc-check-cfg=cfg(fallback)");
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=CARGO_CFG_TARGET_FEATURE");

    let mut features = CpuFeature::features();

    let forced = env::var_os("CARGO_FEATURE_FORCE_FALLBACK").is_some();

    if TargetDetector::is_x86() && !forced {
        TargetDetector::detect_features(&mut features);
    }

    TargetDetector::apply(&mut features);
}
