//! Version information stamped in by `build.rs`.

pub const GIT_DESCRIBE: &str = env!("GIT_DESCRIBE");
pub const GIT_HASH: &str = env!("GIT_HASH");

pub fn report(name: &str) -> String {
    format!(
        "{{\n  \"name\": \"{name}\",\n  \"version\": \"{}\",\n  \"git_describe\": \"{GIT_DESCRIBE}\",\n  \"git_hash\": \"{GIT_HASH}\"\n}}",
        env!("CARGO_PKG_VERSION")
    )
}

pub fn print_report(name: &str) {
    println!("{}", report(name));
}
