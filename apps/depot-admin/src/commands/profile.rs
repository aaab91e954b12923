use std::path::PathBuf;

use anyhow::Context as _;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use clap::Args;
use resources::domain::{Draft, ProfileDraft};
use resources_sdk::{Employee, ResourceId, ResourceKind, decode};

use super::Context;

/// Without any edit flag the profile is only shown.
#[derive(Args)]
pub struct ProfileArgs {
    /// Employee to edit; defaults to the signed-in user
    #[arg(long)]
    id: Option<i64>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    country: Option<String>,
    /// Digits only
    #[arg(long)]
    contactno: Option<String>,
    #[arg(long)]
    address: Option<String>,
    /// New avatar image; sent base64 encoded
    #[arg(long)]
    image: Option<PathBuf>,
}

impl ProfileArgs {
    pub async fn run(self, ctx: &Context) -> anyhow::Result<()> {
        if !ctx.session.is_authenticated() {
            anyhow::bail!("profile needs a session: pass --token, or --email and --password");
        }
        let Some(id) = self.id.or_else(|| ctx.session.user().map(|u| u.id)) else {
            anyhow::bail!("no signed-in user to default to; pass --id");
        };

        let value = ctx
            .gateway
            .get(ResourceKind::Employees, &ResourceId::Numeric(id))
            .await?;
        let employee: Employee = decode(value)?;
        if !self.has_edits() {
            return ctx.output.item(&employee);
        }

        let mut draft = ProfileDraft::default();
        draft.prepare(&employee);
        if let Some(path) = &self.image {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read image {}", path.display()))?;
            draft.image_base64 = STANDARD.encode(bytes);
        }
        self.apply(&mut draft);
        let patch = draft.to_patch(&employee)?;

        let updated = ctx
            .session
            .update_profile(ctx.gateway.as_ref(), id, &patch)
            .await?;
        ctx.notifier.success(&format!("profile {id} updated"));
        ctx.output.item(&updated)
    }

    fn has_edits(&self) -> bool {
        [
            &self.name,
            &self.email,
            &self.country,
            &self.contactno,
            &self.address,
        ]
        .iter()
        .any(|field| field.is_some())
            || self.image.is_some()
    }

    fn apply(self, draft: &mut ProfileDraft) {
        let edits = [
            (self.name, &mut draft.name),
            (self.email, &mut draft.email),
            (self.country, &mut draft.country),
            (self.contactno, &mut draft.contactno),
            (self.address, &mut draft.address),
        ];
        for (edit, field) in edits {
            if let Some(value) = edit {
                *field = value;
            }
        }
    }
}
