use clap::Parser;
use nutshell_rs::config::SimConfig;
use nutshell_rs::net::{InjectFlow, NetWorld};
use nutshell_rs::report::RoutingReport;
use nutshell_rs::sim::{SimTime, Simulator};
use nutshell_rs::topo::fat_tree::{build_fat_tree, start_routing};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "fat-tree-routing",
    about = "Run fat-tree IPv4 routing on a simulated k-ary fat-tree and send probe flows"
)]
struct Args {
    /// Path to a JSON simulation config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override fat-tree k (even, 4..=32)
    #[arg(long)]
    k: Option<usize>,

    /// Run until this time (ms)
    #[arg(long)]
    until_ms: Option<u64>,

    /// Print every node's routing table after the run
    #[arg(long)]
    print_tables: bool,

    /// Write a JSON report of roles, routing tables and stats
    #[arg(long)]
    report_json: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = match &args.config {
        Some(path) => SimConfig::from_path(path)?,
        None => SimConfig::default(),
    };
    if let Some(k) = args.k {
        cfg.topology.k = Some(k);
    }
    if let Some(ms) = args.until_ms {
        cfg.until_ms = Some(ms);
    }

    let opts = cfg.fat_tree_opts()?;
    let flows = cfg.flows(opts.k)?;

    let mut sim = Simulator::default();
    let mut world = NetWorld::default();
    let topo = build_fat_tree(&mut world, &opts)?;
    start_routing(&world, &mut sim, SimTime::ZERO);

    let probes = &cfg.probes;
    for (i, flow) in flows.iter().enumerate() {
        let [sp, se, sh] = flow.src;
        let [dp, de, dh] = flow.dst;
        sim.schedule(
            probes.start(),
            InjectFlow {
                flow_id: i as u64 + 1,
                src: topo.host(sp, se, sh),
                dst: topo.host_address(dp, de, dh),
                pkt_bytes: probes.pkt_bytes(),
                remaining: probes.pkts_per_flow(),
                gap: probes.gap(),
            },
        );
    }

    sim.run_until(cfg.until(), &mut world);

    let stats = &world.net.stats;
    println!(
        "done @ {:?}, delivered_pkts={}, delivered_bytes={}, dropped_pkts={}, no_route_pkts={}, control_pkts={}",
        sim.now(),
        stats.delivered_pkts,
        stats.delivered_bytes,
        stats.dropped_pkts,
        stats.no_route_pkts,
        stats.control_pkts
    );

    if args.print_tables {
        for node in world.net.nodes() {
            let role = node.routing().role();
            println!(
                "\n{} ({:?}) switch={} core={}",
                node.name(),
                node.kind(),
                role.switch,
                role.is_core
            );
            print!("{}", node.routing().table());
        }
    }

    if let Some(path) = &args.report_json {
        let report = RoutingReport::collect(&sim, &world.net);
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        eprintln!("wrote routing report to {}", path.display());
    }
    Ok(())
}
