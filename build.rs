fn main() {
    println!("cargo:rerun-if-env-changed=AUTHDASH_SUPABASE_URL");
    println!("cargo:rerun-if-env-changed=AUTHDASH_SUPABASE_ANON_KEY");
    println!("cargo:rerun-if-env-changed=AUTHDASH_LOG_LEVEL");

    built::write_built_file().expect("Failed to acquire build-time information");
}
