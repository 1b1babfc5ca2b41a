use crate::config::Config;
use sysinfo::System;

#[derive(Debug)]
pub struct SystemInfo {
    pub version: String,
    pub platform: String,
    pub arch: String,
    pub cpus: usize,
    pub memory_total_gb: f64,
    pub memory_free_gb: f64,
}

pub fn get_system_info() -> SystemInfo {
    let mut system = System::new();
    system.refresh_cpu();
    system.refresh_memory();

    SystemInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        platform: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpus: system.cpus().len(),
        memory_total_gb: system.total_memory() as f64 / 1024.0 / 1024.0 / 1024.0,
        memory_free_gb: system.free_memory() as f64 / 1024.0 / 1024.0 / 1024.0,
    }
}

pub fn print_startup_info(config: &Config) {
    let sys_info = get_system_info();

    println!("{}", "=".repeat(60));
    println!("🚀 Video Metadata API v{}", sys_info.version);
    println!("{}", "=".repeat(60));
    println!("📊 System Information:");
    println!("  Platform: {} ({})", sys_info.platform, sys_info.arch);
    println!("  CPUs: {}", sys_info.cpus);
    println!(
        "  Memory: {:.2} GB total, {:.2} GB free",
        sys_info.memory_total_gb, sys_info.memory_free_gb
    );
    println!("⚙️  Configuration:");
    println!("  Listen: {}", config.bind_addr());
    println!(
        "  Database: {}@{}:{}/{}",
        config.database.user, config.database.host, config.database.port, config.database.name
    );
    println!("  Upload Dir: {:?}", config.upload_dir);
    println!(
        "  Max Upload: {} MB",
        config.max_upload_size / 1024 / 1024
    );
    println!("  Queue Topic: {} (not published to)", config.queue_topic);
    println!("{}", "=".repeat(60));
}
