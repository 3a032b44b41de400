// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Embedded CUE templates for the generated GitOps repository.

use crate::error::Result;
use tera::{Context, Tera};

pub const NAMESPACE: &str = "ns.cue";
pub const APP: &str = "app.cue";
pub const HELM_APP: &str = "helm-app.cue";

const NAMESPACE_BODY: &str = r#"package {{ package }}

import (
	"github.com/kharf/declcd/schema/component"
)

ns: component.#Manifest & {
	content: {
		apiVersion: "v1"
		kind:       "Namespace"
		metadata: {
			name: "{{ namespace }}"
		}
	}
}
"#;

const APP_BODY: &str = r#"package {{ package }}

import (
	"github.com/kharf/declcd/schema/component"
)

deployment: component.#Manifest & {
	content: {
		apiVersion: "apps/v1"
		kind:       "Deployment"
		metadata: {
			name:      "{{ app }}"
			namespace: "{{ namespace }}"
		}
		spec: {
			replicas: 1
			selector: matchLabels: app: "{{ app }}"
			template: {
				metadata: labels: app: "{{ app }}"
				spec: containers: [{
					name:  "{{ app }}"
					image: "{{ image }}"
					ports: [{containerPort: 8080}]
				}]
			}
		}
	}
}
"#;

const HELM_APP_BODY: &str = r#"package {{ package }}

import (
	"github.com/kharf/declcd/schema/component"
)

release: component.#HelmRelease & {
	name:      "{{ helm_app }}"
	namespace: "{{ namespace }}"
	chart: {
		name:    "{{ chart_name }}"
		repoURL: "{{ repo_url }}"
		version: "0.1.0"
	}
	values: {}
}
"#;

/// Render one of the embedded templates with the given context.
/// Fails when the template references a variable missing from the context.
pub fn render(template: &str, context: &Context) -> Result<String> {
    let mut tera = Tera::default();
    tera.add_raw_template(NAMESPACE, NAMESPACE_BODY)?;
    tera.add_raw_template(APP, APP_BODY)?;
    tera.add_raw_template(HELM_APP, HELM_APP_BODY)?;
    Ok(tera.render(template, context)?)
}
