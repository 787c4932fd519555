//! 病害表单状态
//!
//! 除表单本身外，还包含嵌套的"新增植物"弹窗与植物下拉选项。
//! 新增植物成功后递增 [`OptionsEpoch`]，选项重新拉取，父表单保持打开。

use leptos::prelude::*;
use leptos::task::spawn_local;
use plantdoc_admin::form::{DiseaseForm, ModalForm, OptionsEpoch, PlantForm};
use plantdoc_shared::Plant;

use crate::auth::AdminApi;
use crate::components::notice::NoticeContext;

#[derive(Clone, Copy)]
pub struct DiseaseFormState {
    pub form: RwSignal<ModalForm<DiseaseForm>>,
    pub plant_form: RwSignal<ModalForm<PlantForm>>,
    pub epoch: RwSignal<OptionsEpoch>,
    pub plants: RwSignal<Vec<Plant>>,
}

impl DiseaseFormState {
    pub fn new() -> Self {
        Self {
            form: RwSignal::new(ModalForm::default()),
            plant_form: RwSignal::new(ModalForm::default()),
            epoch: RwSignal::new(OptionsEpoch::default()),
            plants: RwSignal::new(Vec::new()),
        }
    }

    /// 表单打开时以及每次 epoch 变化时拉取植物选项
    pub fn watch_options(&self, api: StoredValue<AdminApi>, notices: NoticeContext) {
        let Self {
            form,
            epoch,
            plants,
            ..
        } = *self;

        // 只跟踪 open，输入字段变化不触发重新拉取
        let is_open = Memo::new(move |_| form.with(|f| f.open));

        Effect::new(move |_| {
            let _ = epoch.get();
            if !is_open.get() {
                return;
            }
            let api = api.get_value();
            spawn_local(async move {
                match api.all_plants().await {
                    Ok(list) => {
                        plants.try_set(list);
                    }
                    Err(e) => notices.push(e.notice()),
                }
            });
        });
    }

    /// (值, 显示文本)；当前表单里的植物名不在列表中时也保留为一个选项
    pub fn plant_options(&self) -> Signal<Vec<(String, String)>> {
        let Self { form, plants, .. } = *self;
        Signal::derive(move || {
            let current = form.with(|f| f.values.plant_name.clone());
            let mut options: Vec<(String, String)> = plants.with(|list| {
                list.iter()
                    .map(|p| (p.name.clone(), p.name.clone()))
                    .collect()
            });
            if !current.is_empty() && !options.iter().any(|(v, _)| *v == current) {
                options.insert(0, (current.clone(), current));
            }
            options
        })
    }

    /// 嵌套弹窗新增植物成功：刷新选项并选中新植物
    pub fn plant_created(&self, plant: Plant) {
        self.epoch.update(OptionsEpoch::bump);
        self.form.update(|f| f.values.plant_name = plant.name);
    }
}
