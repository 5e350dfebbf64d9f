use yew::html::Scope;
use yew::prelude::*;

use crate::components::gallery::{GalleryComponent, Msg};

/// Full-screen overlay for the selected photo. The backdrop, the close button
/// and Escape all dismiss it; clicks on the photo itself do not.
pub fn viewer_dialog(gallery: &GalleryComponent, link: &Scope<GalleryComponent>) -> Html {
    let Some(src) = gallery.selected_image.clone() else {
        return html! {};
    };

    let onkeydown = link.batch_callback(|e: KeyboardEvent| {
        (e.key() == "Escape").then_some(Msg::CloseViewer)
    });

    html! {
        <div
            class="viewer-backdrop"
            ref={gallery.viewer_ref.clone()}
            tabindex="0"
            onclick={link.callback(|_| Msg::CloseViewer)}
            {onkeydown}
        >
            <button
                class="viewer-close"
                onclick={link.callback(|e: MouseEvent| {
                    e.stop_propagation();
                    Msg::CloseViewer
                })}
            >
                { "✕" }
            </button>
            <img
                class="viewer-image"
                {src}
                alt="Wedding memory"
                onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}
            />
        </div>
    }
}
