//! # HUD 区域与命中测试
//!
//! HUD 是右侧固定宽度的面板。布局每次重建都会生成一组
//! [`HudRegion`]：面板背景（吸收点击）、小地图占位、三个层级按钮，
//! 以及当前场景提供的控件。命中测试从后往前找，后加入的
//! （更具体的）区域优先于面板背景。

use super::geometry::{Point, ScreenRect};
use super::input::{InputEvent, Key, PointerButton};
use crate::config::game::HudConfig;
use crate::scene::SceneId;

/// 场景内可开关的图层
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerToggle {
    Grid,
    Units,
    Orbits,
    Labels,
    SpiralArms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudAction {
    SwitchScene(SceneId),
    ToggleLayer(LayerToggle),
    SelectCategory(usize),
    MiniMap,
    /// 面板背景：只吸收输入
    Panel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HudRegion {
    pub rect: ScreenRect,
    pub action: HudAction,
    pub label: String,
    /// 按钮当前是否处于选中 / 开启状态（仅用于绘制）
    pub active: bool,
}

/// 场景向 HUD 提供的控件描述，位置由布局决定
#[derive(Debug, Clone, PartialEq)]
pub struct HudControl {
    pub label: String,
    pub action: HudAction,
    pub active: bool,
}

impl HudControl {
    pub fn new(label: impl Into<String>, action: HudAction, active: bool) -> Self {
        Self {
            label: label.into(),
            action,
            active,
        }
    }
}

const TITLE_HEIGHT: f64 = 40.0;
const MINIMAP_HEIGHT: f64 = 150.0;
const BUTTON_GAP: f64 = 5.0;

#[derive(Debug, Clone, Default)]
pub struct HudLayout {
    regions: Vec<HudRegion>,
    world_area: ScreenRect,
}

impl HudLayout {
    /// 根据视口、当前场景与其控件重建整套区域
    pub fn build(
        viewport: ScreenRect,
        config: &HudConfig,
        scene: SceneId,
        controls: &[HudControl],
    ) -> Self {
        let (world_area, panel) = viewport.split_right(config.panel_width);
        let pad = config.padding;
        let inner_w = (panel.w - pad * 2.0).max(0.0);
        let mut regions = Vec::with_capacity(5 + controls.len());

        regions.push(HudRegion {
            rect: panel,
            action: HudAction::Panel,
            label: String::new(),
            active: false,
        });

        let mut y = panel.y + TITLE_HEIGHT;
        regions.push(HudRegion {
            rect: ScreenRect::new(panel.x + pad, y, inner_w, MINIMAP_HEIGHT),
            action: HudAction::MiniMap,
            label: "小地图".to_string(),
            active: false,
        });
        y += MINIMAP_HEIGHT + pad * 2.0;

        // 层级按钮：一行三个
        let count = SceneId::ALL.len() as f64;
        let button_w = ((inner_w - BUTTON_GAP * (count - 1.0)) / count).max(0.0);
        for (i, id) in SceneId::ALL.iter().enumerate() {
            regions.push(HudRegion {
                rect: ScreenRect::new(
                    panel.x + pad + i as f64 * (button_w + BUTTON_GAP),
                    y,
                    button_w,
                    config.button_height,
                ),
                action: HudAction::SwitchScene(*id),
                label: id.label().to_string(),
                active: *id == scene,
            });
        }
        y += config.button_height + pad * 2.0;

        // 场景控件：纵向排列
        for control in controls {
            regions.push(HudRegion {
                rect: ScreenRect::new(panel.x + pad, y, inner_w, config.button_height),
                action: control.action,
                label: control.label.clone(),
                active: control.active,
            });
            y += config.button_height + BUTTON_GAP;
        }

        Self {
            regions,
            world_area,
        }
    }

    pub fn regions(&self) -> &[HudRegion] {
        &self.regions
    }

    /// 去掉面板后的世界画布
    pub fn world_area(&self) -> ScreenRect {
        self.world_area
    }

    /// 最上层命中的区域；越界或 NaN 坐标返回 `None`。
    pub fn hit_test(&self, pos: Point) -> Option<&HudRegion> {
        self.regions.iter().rev().find(|r| r.rect.contains(pos))
    }

    /// 数字键 1/2/3 直接切换层级
    pub fn hotkey(&self, key: Key) -> Option<HudAction> {
        match key {
            Key::Char('1') => Some(HudAction::SwitchScene(SceneId::Planet)),
            Key::Char('2') => Some(HudAction::SwitchScene(SceneId::System)),
            Key::Char('3') => Some(HudAction::SwitchScene(SceneId::Galaxy)),
            _ => None,
        }
    }

    /// 把事件交给 HUD。返回 `Some` 表示 HUD 消费了该事件。
    ///
    /// 只有主键按下会触发按钮动作；落在 HUD 上的其它指针事件
    /// 一律以 [`HudAction::Panel`] 吸收。
    pub fn offer(&self, event: &InputEvent) -> Option<HudAction> {
        match *event {
            InputEvent::KeyPress { key, .. } => self.hotkey(key),
            InputEvent::PointerDown { pos, button, .. } => {
                let region = self.hit_test(pos)?;
                if button == PointerButton::Primary {
                    Some(region.action)
                } else {
                    Some(HudAction::Panel)
                }
            }
            InputEvent::PointerDrag { pos, .. }
            | InputEvent::PointerUp { pos, .. }
            | InputEvent::Scroll { pos, .. } => {
                self.hit_test(pos).map(|_| HudAction::Panel)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HudConfig {
        HudConfig {
            panel_width: 300.0,
            button_height: 30.0,
            padding: 10.0,
        }
    }

    fn viewport() -> ScreenRect {
        ScreenRect::new(0.0, 0.0, 1600.0, 900.0)
    }

    fn planet_layout() -> HudLayout {
        let controls = vec![
            HudControl::new("网格", HudAction::ToggleLayer(LayerToggle::Grid), false),
            HudControl::new("单位", HudAction::ToggleLayer(LayerToggle::Units), true),
        ];
        HudLayout::build(viewport(), &config(), SceneId::Planet, &controls)
    }

    fn center_of(layout: &HudLayout, action: HudAction) -> Point {
        layout
            .regions()
            .iter()
            .find(|r| r.action == action)
            .map(|r| r.rect.center())
            .expect("region present")
    }

    #[test]
    fn panel_sits_on_the_right_edge() {
        let layout = planet_layout();
        assert_eq!(layout.regions()[0].action, HudAction::Panel);
        assert_eq!(layout.regions()[0].rect, ScreenRect::new(1300.0, 0.0, 300.0, 900.0));
        assert_eq!(layout.world_area(), ScreenRect::new(0.0, 0.0, 1300.0, 900.0));
    }

    #[test]
    fn buttons_win_over_panel_background() {
        let layout = planet_layout();
        let pos = center_of(&layout, HudAction::SwitchScene(SceneId::Galaxy));
        let hit = layout.hit_test(pos).expect("hit");
        assert_eq!(hit.action, HudAction::SwitchScene(SceneId::Galaxy));
    }

    #[test]
    fn empty_panel_area_is_absorbed() {
        let layout = planet_layout();
        let hit = layout.hit_test((1450.0, 880.0)).expect("panel");
        assert_eq!(hit.action, HudAction::Panel);
    }

    #[test]
    fn world_area_and_out_of_bounds_match_nothing() {
        let layout = planet_layout();
        assert!(layout.hit_test((200.0, 200.0)).is_none());
        assert!(layout.hit_test((-5.0, 10.0)).is_none());
        assert!(layout.hit_test((1700.0, 10.0)).is_none());
        assert!(layout.hit_test((f64::NAN, f64::NAN)).is_none());
    }

    #[test]
    fn current_scene_button_is_marked_active() {
        let layout = planet_layout();
        let active: Vec<_> = layout
            .regions()
            .iter()
            .filter(|r| matches!(r.action, HudAction::SwitchScene(_)) && r.active)
            .map(|r| r.action)
            .collect();
        assert_eq!(active, vec![HudAction::SwitchScene(SceneId::Planet)]);
    }

    #[test]
    fn secondary_click_on_button_only_absorbs() {
        let layout = planet_layout();
        let pos = center_of(&layout, HudAction::ToggleLayer(LayerToggle::Grid));
        assert_eq!(
            layout.offer(&InputEvent::secondary_down(pos)),
            Some(HudAction::Panel)
        );
        assert_eq!(
            layout.offer(&InputEvent::down(pos)),
            Some(HudAction::ToggleLayer(LayerToggle::Grid))
        );
    }

    #[test]
    fn scroll_over_panel_is_consumed() {
        let layout = planet_layout();
        assert_eq!(
            layout.offer(&InputEvent::scroll((1400.0, 600.0), 1.0)),
            Some(HudAction::Panel)
        );
        assert_eq!(layout.offer(&InputEvent::scroll((400.0, 600.0), 1.0)), None);
    }

    #[test]
    fn digit_hotkeys_switch_scenes() {
        let layout = planet_layout();
        assert_eq!(
            layout.offer(&InputEvent::key(Key::Char('2'))),
            Some(HudAction::SwitchScene(SceneId::System))
        );
        assert_eq!(layout.offer(&InputEvent::key(Key::Char('c'))), None);
    }
}
