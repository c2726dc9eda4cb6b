fn main() {
    // CARGO_CFG_TARGET_OS reflects the target platform; #[cfg()] in build.rs
    // would check the host instead.
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os == "windows" {
        // libgit2-sys needs the security and registry functions from advapi32
        println!("cargo:rustc-link-lib=advapi32");
    }
}
