//! Orchestrator configuration.

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Workflow template submitted after an organization is persisted.
    pub workflow_template: String,
    /// Account id of the per-organization administrator.
    pub admin_account: String,
    /// Initial password of that administrator. The caller is expected to
    /// force a change through the password update path.
    pub admin_initial_password: String,
    /// Role given to the administrator.
    pub admin_role: String,
    /// Optional pepper prepended to passwords before Argon2id hashing.
    pub pepper: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            workflow_template: "create-contract-repo".into(),
            admin_account: "admin".into(),
            admin_initial_password: "admin".into(),
            admin_role: "admin".into(),
            pepper: None,
        }
    }
}
