//! View rendering for the gallery: header, loading state, the rotating
//! polaroid collage and the viewer overlay.

use common::display::{orientation_of, rotation_angle};
use web_sys::HtmlImageElement;
use yew::html::Scope;
use yew::prelude::*;

use super::dialogs::viewer::viewer_dialog;
use super::messages::Msg;
use super::state::GalleryComponent;
use crate::collage_grid::CollageGrid;

pub fn view(gallery: &GalleryComponent, ctx: &Context<GalleryComponent>) -> Html {
    let link = ctx.link();
    let props = ctx.props();

    html! {
        <div class="gallery-root">
            <header class="gallery-header">
                <span class="leaf">{ "🌿" }</span>
                <h1>{ props.title.clone() }</h1>
                <span class="leaf">{ "🌿" }</span>
            </header>
            {
                if gallery.loading {
                    build_loading()
                } else {
                    build_collage(gallery, link, props.columns)
                }
            }
            { viewer_dialog(gallery, link) }
        </div>
    }
}

fn build_loading() -> Html {
    html! {
        <div class="gallery-loading">
            <div class="spinner"></div>
            <p>{ "Loading memories..." }</p>
        </div>
    }
}

fn build_collage(gallery: &GalleryComponent, link: &Scope<GalleryComponent>, columns: usize) -> Html {
    let indices = gallery.rotation.indices(gallery.messages.len());

    html! {
        <main class="gallery-body">
            <CollageGrid {columns}>
                { for indices.into_iter().enumerate().map(|(slot, index)| polaroid_card(gallery, link, slot, index)) }
            </CollageGrid>
        </main>
    }
}

/// One card, keyed by its slot in the window so a rotation tick updates the
/// existing cards in place.
fn polaroid_card(
    gallery: &GalleryComponent,
    link: &Scope<GalleryComponent>,
    slot: usize,
    index: usize,
) -> Html {
    let message = &gallery.messages[index];
    let style = format!(
        "--tilt: {}deg; animation-delay: {:.1}s;",
        rotation_angle(index),
        index as f64 * 0.1
    );
    let onclick = message
        .image_ref
        .clone()
        .map(|src| link.callback(move |_: MouseEvent| Msg::OpenViewer(src.clone())));
    let class = classes!("polaroid-card", message.has_image().then_some("clickable"));

    html! {
        <div key={slot.to_string()} {class} {style} {onclick}>
            <div class="polaroid-frame">
                if let Some(src) = &message.image_ref {
                    { photo(gallery, link, index, src, &message.name) }
                }
                <div class="polaroid-caption">
                    <p class="blessing">{ message.blessing.clone() }</p>
                    <p class="name">{ message.name.clone() }</p>
                </div>
            </div>
        </div>
    }
}

fn photo(
    gallery: &GalleryComponent,
    link: &Scope<GalleryComponent>,
    index: usize,
    src: &str,
    alt: &str,
) -> Html {
    let aspect = orientation_of(&gallery.image_dimensions, index).frame_aspect();
    let onload = {
        let src = src.to_string();
        link.callback(move |e: Event| {
            let img: HtmlImageElement = e.target_unchecked_into();
            Msg::ImageLoaded {
                src: src.clone(),
                width: img.natural_width(),
                height: img.natural_height(),
            }
        })
    };

    html! {
        <div class="polaroid-photo" style={format!("aspect-ratio: {aspect};")}>
            <img src={src.to_string()} alt={alt.to_string()} {onload} />
        </div>
    }
}
