fn main() {
    // Stamp the demo binary with its build time
    let build_date = chrono::Utc::now()
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string();
    println!("cargo:rustc-env=SHAPEKIT_BUILD_DATE={}", build_date);
}
