// Build provenance shown by `oscprims version --extended`.
fn main() {
    for (source, exported) in [
        ("TARGET", "OSCPRIMS_BUILD_TARGET"),
        ("PROFILE", "OSCPRIMS_BUILD_PROFILE"),
    ] {
        if let Ok(value) = std::env::var(source) {
            println!("cargo:rustc-env={exported}={value}");
        }
        println!("cargo:rerun-if-env-changed={source}");
    }
}
