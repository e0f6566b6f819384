fn main() {
    let now = time::OffsetDateTime::now_utc();
    let date_fmt = time::format_description::parse("[month repr:short] [day padding:space] [year]");
    let time_fmt = time::format_description::parse("[hour]:[minute]:[second]");

    let date = std::env::var("ZF3D_BUILD_DATE").unwrap_or_else(|_| {
        date_fmt
            .ok()
            .and_then(|f| now.format(&f).ok())
            .unwrap_or_else(|| "unknown".to_string())
    });
    let time = std::env::var("ZF3D_BUILD_TIME").unwrap_or_else(|_| {
        time_fmt
            .ok()
            .and_then(|f| now.format(&f).ok())
            .unwrap_or_else(|| "unknown".to_string())
    });

    println!("cargo:rerun-if-env-changed=ZF3D_BUILD_DATE");
    println!("cargo:rerun-if-env-changed=ZF3D_BUILD_TIME");
    println!("cargo:rustc-env=ZF3D_BUILD_DATE={}", date);
    println!("cargo:rustc-env=ZF3D_BUILD_TIME={}", time);
}
