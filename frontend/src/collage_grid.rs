use yew::{html, Children, Component, Context, Html, Properties};

/// Masonry-style column layout for the polaroid cards.
#[derive(Properties, PartialEq)]
pub struct CollageGridProps {
    /// Column count on wide screens; narrower screens drop columns in CSS.
    pub columns: usize,
    pub children: Children,
}

pub struct CollageGrid;

impl Component for CollageGrid {
    type Message = ();
    type Properties = CollageGridProps;

    fn create(_ctx: &Context<Self>) -> Self {
        CollageGrid
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let style = format!("--collage-columns: {};", props.columns);

        html! {
            <div class="collage-grid" style={style}>
                { for props.children.iter() }
            </div>
        }
    }
}
