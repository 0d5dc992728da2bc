use crate::model::chain::registry;

/// Print a human-readable listing of the configured chain registry.
pub fn run() -> anyhow::Result<()> {
    println!("Configured chains");
    println!("=================");
    for c in registry() {
        println!(
            "{:<10} id={:<6} native={} ({} decimals)\n  rpc: {}",
            c.name, c.chain_id, c.native_symbol, c.native_decimals, c.rpc_url
        );
    }
    Ok(())
}
