//! Hash a password for seeding an admin profile by hand:
//! `hash-password 'secret-pass'`.

fn main() -> anyhow::Result<()> {
    let password = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: hash-password <password>"))?;
    let hash = server::auth::password::hash_password(&password).map_err(|e| anyhow::anyhow!("{e}"))?;
    println!("{hash}");
    Ok(())
}
