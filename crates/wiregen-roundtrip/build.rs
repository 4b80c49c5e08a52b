fn main() -> Result<(), Box<dyn std::error::Error>> {
    wiregen_build::build!("schemas/monster.json");

    Ok(())
}
