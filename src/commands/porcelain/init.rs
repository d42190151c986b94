use crate::areas::repository::Repository;

impl Repository {
    /// Report a freshly initialized repository
    pub fn announce_init(&self) -> anyhow::Result<()> {
        writeln!(
            self.writer(),
            "Initialized empty Git repository in {}",
            self.git_path().display()
        )?;

        Ok(())
    }
}
