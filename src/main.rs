fn main() {
    if let Err(err) = agency_dashboard_lib::run() {
        eprintln!("agency-dashboard: {err:#}");
        std::process::exit(1);
    }
}
