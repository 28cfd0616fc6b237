fn main() -> anyhow::Result<()> {
    pollster::block_on(chroma_sphere::run())
}
