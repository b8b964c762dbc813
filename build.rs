fn main() {
    println!("cargo:rerun-if-changed=winipv4backup.rc");
    println!("cargo:rerun-if-changed=winipv4backup.exe.manifest");

    #[cfg(windows)]
    embed_resource::compile("winipv4backup.rc", embed_resource::NONE)
        .manifest_optional()
        .expect("failed to embed application manifest");
}
