mod platform;

fn main() -> anyhow::Result<()> {
    platform::run(std::env::args().skip(1))
}
