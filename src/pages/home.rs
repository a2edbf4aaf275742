use leptos::prelude::*;

use super::platform::platform_data;
use crate::components::arch_diagram::{ArchDiagramCanvas, DiagramNode};

/// Side panel for the node picked on the diagram.
#[component]
fn DetailsPanel(selected: RwSignal<Option<DiagramNode>>) -> impl IntoView {
	move || {
		selected.get().map(|node| {
			view! {
				<aside class="details-panel">
					<button class="details-close" on:click=move |_| selected.set(None)>
						"×"
					</button>
					<h2>{node.id}</h2>
					{node.subtitle.map(|s| view! { <p class="details-subtitle">{s}</p> })}
					<p>{node.description}</p>
					{node
						.doc_url
						.map(|url| {
							view! {
								<a href=url class="details-docs">
									"Documentação"
								</a>
							}
						})}
				</aside>
			}
		})
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let diagram = Signal::derive(platform_data);
	let selected = RwSignal::new(None::<DiagramNode>);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-diagram">
				<ArchDiagramCanvas data=diagram selected=selected />
				<div class="diagram-overlay">
					<h1>"Platform Architecture"</h1>
					<p class="subtitle">"Hover a service to trace its connections. Click for details."</p>
				</div>
				<DetailsPanel selected=selected />
			</div>
		</ErrorBoundary>
	}
}
