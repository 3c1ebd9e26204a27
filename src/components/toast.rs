use iocraft::prelude::*;

use crate::color::ColorDepth;
use crate::icons::ResolvedIcons;
use crate::sidebar::{Toast, ToastKind};
use crate::theme::ResolvedTheme;

pub struct RenderedToast {
    pub icon: String,
    pub message: String,
    pub fg: Color,
}

impl RenderedToast {
    pub fn build(toast: &Toast, theme: &ResolvedTheme, icons: &ResolvedIcons, depth: ColorDepth) -> Self {
        let (icon, color) = match toast.kind {
            ToastKind::Success => (&icons.toast_success, theme.text_success),
            ToastKind::Error => (&icons.toast_error, theme.text_error),
        };
        Self {
            icon: icon.clone(),
            message: toast.message.clone(),
            fg: color.to_crossterm_color(depth),
        }
    }
}

#[derive(Default, Props)]
pub struct ToastBannerProps {
    pub toast: Option<RenderedToast>,
}

#[component]
pub fn ToastBanner(props: &mut ToastBannerProps) -> impl Into<AnyElement<'static>> {
    let Some(toast) = props.toast.take() else {
        return element! { View }.into_any();
    };

    element! {
        View(padding_left: 1, padding_right: 1) {
            Text(
                content: format!("{} {}", toast.icon, toast.message),
                color: toast.fg,
                weight: Weight::Bold,
                wrap: TextWrap::NoWrap,
            )
        }
    }
    .into_any()
}
